//! One module per subcommand.

pub mod completions;
pub mod gen_master;
pub mod generate;
pub mod inspect;
pub mod open;
pub mod seal;
pub mod version;
