//! Response representations decorated with navigation links.
//!
//! Links are attached to owned wrappers built per response, never to the
//! stored entities themselves.

mod assembler;
mod links;

pub use assembler::{
    Linked, LinkedCollection, Resource, ResourceAssembler, UserView, build_statistics,
};
pub use links::{Link, RouteRegistry, routes};
