pub mod fnl;
