mod caps;
mod common;
mod groups;
mod registry;
