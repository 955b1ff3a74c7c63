mod helpers;

mod class_tests;
mod fsio_tests;
mod index_tests;
