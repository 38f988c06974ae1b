
mod path;
mod snbt;
