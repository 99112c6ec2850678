//! Parser modules, one per grammar production family, mirroring `gosub_css3::parser`'s
//! submodule layout (`parser/block.rs`, `parser/rule.rs`, `parser/declaration.rs`,
//! `parser/at_rule.rs`, `parser/url.rs`, ...) while narrowing the surface to syntax-level
//! parsing only.

pub mod at_rule;
pub mod component_value;
pub mod declaration;
pub mod rule;

pub use component_value::{parse_component_value_list, parse_one_component_value};
pub use declaration::{parse_blocks_contents, parse_one_declaration};
pub use rule::{parse_one_rule, parse_rule_list, parse_stylesheet};
