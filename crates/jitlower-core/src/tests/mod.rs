/*! Unit coverage for the target IR and its builder. */

mod builder_tests;
mod type_tests;
