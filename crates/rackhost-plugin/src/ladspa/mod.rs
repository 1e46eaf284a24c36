//! LADSPA plugin format.
//!
//! [`ffi`] mirrors `ladspa.h`, [`library`] opens shared objects and walks
//! their descriptors, [`rdf`] carries the optional auxiliary metadata, and
//! [`LadspaPlugin`] is the adapter built on top of them.

pub mod ffi;

mod instance;
pub use instance::InstanceSlots;

mod library;
pub use library::{Descriptor, LadspaLibrary, PortDecl};

mod plugin;
pub use plugin::{new_ladspa, LadspaPlugin};

pub mod rdf;
pub use rdf::{RdfClass, RdfDescriptor, RdfPort, RdfUnit, ScalePoint};
