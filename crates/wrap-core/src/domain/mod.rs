//! Domain entities for Cursor-Wrap.
//!
//! Pure geometry and configuration values with no infrastructure
//! dependencies.  Everything here can be built and tested on any platform
//! without a display attached.

/// Points and monitor rectangles in virtual-desktop coordinates.
pub mod geometry;

/// Wrap configuration values supplied by the settings collaborator.
pub mod settings;

/// Edge classification and wrap-destination mapping.
///
/// See [`topology::Topology`] for the main type.
pub mod topology;
