// Utility modules

pub mod io;
