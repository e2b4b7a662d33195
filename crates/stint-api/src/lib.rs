// Stint API Library
//
// This crate provides the REST API layer for the stint job gateway,
// including HTTP handlers, routes, and request/response models.
//
// Handlers are a pure translation layer: they bind request shapes, call the
// lifecycle manager, and map its outcomes onto a fixed error taxonomy. No
// business rules live here.

pub mod handlers;
pub mod models;
pub mod routes;
