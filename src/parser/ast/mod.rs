//! The AST: a closed family of tagged variants mirroring the Swift 2.1
//! grammar summary. Nodes are plain data; every one is immutable after
//! construction and owns its children.

mod attribute;
mod declaration;
mod expression;
mod generics;
mod pattern;
mod statement;
mod type_name;

pub use self::attribute::Attribute;
pub use self::declaration::*;
pub use self::expression::*;
pub use self::generics::*;
pub use self::pattern::*;
pub use self::statement::*;
pub use self::type_name::*;

use crate::lexer::Cursor;
use crate::parser::{Parse, ParseResult};

/// A whole source file: its top-level statements in order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Module {
    pub statements: Vec<Statement>,
}

impl Parse for Module {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        let statements = statement::statement_list(cursor, |_| false)?;
        Ok(Module { statements })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_module() {
        let module = crate::parser::run("", Module::parse).unwrap();
        assert!(module.statements.is_empty());
    }

    #[test]
    fn test_parse_module_with_mixed_statements() {
        let module = crate::parser::run(
            "import Foundation\nlet greeting = \"hello\"\nprint(greeting)",
            Module::parse,
        )
        .unwrap();

        assert_eq!(module.statements.len(), 3);
        assert!(matches!(
            module.statements[0],
            Statement::Declaration(Declaration::Import(_))
        ));
        assert!(matches!(
            module.statements[1],
            Statement::Declaration(Declaration::Constant(_))
        ));
        assert!(matches!(module.statements[2], Statement::Expression(_)));
    }
}
