pub mod io;
pub mod journal;
