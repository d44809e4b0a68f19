mod common;
mod submissions;
