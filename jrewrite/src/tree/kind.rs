//! Node kind registry.
//!
//! [`NodeKind`] is the closed set of mutable node kinds. It maps grammar kinds
//! onto mutable kinds for the mirroring pass, and it answers which kinds a
//! field may hold. [`TreeKind`] is the single, larger enumeration of operator,
//! literal and wildcard kinds; each enum-valued field accepts only the legal
//! subset listed here.

use serde::Serialize;

/// Every kind of mutable node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[allow(missing_docs)]
pub enum NodeKind {
    // Declarations
    CompilationUnit,
    Package,
    Import,
    Module,
    Requires,
    Exports,
    Opens,
    Uses,
    Provides,
    ClassDecl,
    ClassBody,
    EnumConstant,
    MethodDecl,
    VariableDecl,
    VariableDeclarator,
    Parameter,
    Initializer,
    Modifiers,
    Annotation,
    ElementValuePair,
    TypeParameter,
    // Statements
    Block,
    ExpressionStmt,
    If,
    While,
    DoWhile,
    For,
    ForEach,
    Return,
    Break,
    Continue,
    Throw,
    Try,
    Catch,
    Switch,
    Case,
    Labeled,
    Synchronized,
    Assert,
    Yield,
    Empty,
    // Expressions
    Ident,
    FieldAccess,
    MethodInvocation,
    NewClass,
    NewArray,
    ArrayInit,
    Literal,
    Binary,
    Unary,
    Assignment,
    CompoundAssignment,
    Conditional,
    Parens,
    TypeCast,
    InstanceOf,
    ArrayAccess,
    Lambda,
    MemberReference,
    // Patterns
    RecordPattern,
    BindingPattern,
    // Types
    PrimitiveType,
    TypeName,
    ParameterizedType,
    ArrayType,
    Wildcard,
    UnionType,
    IntersectionType,
    AnnotatedType,
}

impl NodeKind {
    /// Maps a tree-sitter Java node kind onto the mutable kind that mirrors it.
    ///
    /// Structural containers such as `argument_list` or `class_body` are
    /// consumed by their parent's constructor and are not listed here.
    #[must_use]
    pub fn from_cst_kind(kind: &str) -> Option<Self> {
        let mapped = match kind {
            "program" => Self::CompilationUnit,
            "package_declaration" => Self::Package,
            "import_declaration" => Self::Import,
            "module_declaration" => Self::Module,
            "requires_module_directive" => Self::Requires,
            "exports_module_directive" => Self::Exports,
            "opens_module_directive" => Self::Opens,
            "uses_module_directive" => Self::Uses,
            "provides_module_directive" => Self::Provides,
            "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "record_declaration"
            | "annotation_type_declaration" => Self::ClassDecl,
            "enum_constant" => Self::EnumConstant,
            "method_declaration"
            | "constructor_declaration"
            | "compact_constructor_declaration"
            | "annotation_type_element_declaration" => Self::MethodDecl,
            "field_declaration" | "local_variable_declaration" | "constant_declaration" => {
                Self::VariableDecl
            }
            "variable_declarator" => Self::VariableDeclarator,
            "formal_parameter" | "spread_parameter" | "catch_formal_parameter" | "resource" => {
                Self::Parameter
            }
            "static_initializer" => Self::Initializer,
            "modifiers" => Self::Modifiers,
            "marker_annotation" | "annotation" => Self::Annotation,
            "element_value_pair" => Self::ElementValuePair,
            "type_parameter" => Self::TypeParameter,
            "block" | "constructor_body" => Self::Block,
            "expression_statement" | "explicit_constructor_invocation" => Self::ExpressionStmt,
            "if_statement" => Self::If,
            "while_statement" => Self::While,
            "do_statement" => Self::DoWhile,
            "for_statement" => Self::For,
            "enhanced_for_statement" => Self::ForEach,
            "return_statement" => Self::Return,
            "break_statement" => Self::Break,
            "continue_statement" => Self::Continue,
            "throw_statement" => Self::Throw,
            "try_statement" | "try_with_resources_statement" => Self::Try,
            "catch_clause" => Self::Catch,
            "switch_expression" | "switch_statement" => Self::Switch,
            "switch_block_statement_group" | "switch_rule" => Self::Case,
            "labeled_statement" => Self::Labeled,
            "synchronized_statement" => Self::Synchronized,
            "assert_statement" => Self::Assert,
            "yield_statement" => Self::Yield,
            "identifier" | "this" | "super" => Self::Ident,
            "field_access" | "class_literal" => Self::FieldAccess,
            "method_invocation" => Self::MethodInvocation,
            "object_creation_expression" => Self::NewClass,
            "array_creation_expression" => Self::NewArray,
            "array_initializer" | "element_value_array_initializer" => Self::ArrayInit,
            "decimal_integer_literal"
            | "hex_integer_literal"
            | "octal_integer_literal"
            | "binary_integer_literal"
            | "decimal_floating_point_literal"
            | "hex_floating_point_literal"
            | "true"
            | "false"
            | "character_literal"
            | "string_literal"
            | "text_block"
            | "null_literal" => Self::Literal,
            "binary_expression" => Self::Binary,
            "unary_expression" | "update_expression" => Self::Unary,
            "assignment_expression" => Self::Assignment,
            "ternary_expression" => Self::Conditional,
            "parenthesized_expression" => Self::Parens,
            "cast_expression" => Self::TypeCast,
            "instanceof_expression" => Self::InstanceOf,
            "array_access" => Self::ArrayAccess,
            "lambda_expression" => Self::Lambda,
            "method_reference" => Self::MemberReference,
            "record_pattern" => Self::RecordPattern,
            "type_pattern" | "record_pattern_component" | "underscore_pattern" => {
                Self::BindingPattern
            }
            "integral_type" | "floating_point_type" | "boolean_type" | "void_type" => {
                Self::PrimitiveType
            }
            "type_identifier" | "scoped_type_identifier" => Self::TypeName,
            "generic_type" => Self::ParameterizedType,
            "array_type" => Self::ArrayType,
            "wildcard" => Self::Wildcard,
            "catch_type" => Self::UnionType,
            "annotated_type" => Self::AnnotatedType,
            _ => return None,
        };
        Some(mapped)
    }

    /// Kinds usable where an expression is expected.
    #[must_use]
    pub const fn is_expression(self) -> bool {
        matches!(
            self,
            Self::Ident
                | Self::FieldAccess
                | Self::MethodInvocation
                | Self::NewClass
                | Self::NewArray
                | Self::ArrayInit
                | Self::Literal
                | Self::Binary
                | Self::Unary
                | Self::Assignment
                | Self::CompoundAssignment
                | Self::Conditional
                | Self::Parens
                | Self::TypeCast
                | Self::InstanceOf
                | Self::ArrayAccess
                | Self::Lambda
                | Self::MemberReference
                | Self::Switch
        )
    }

    /// Kinds usable where a statement is expected.
    #[must_use]
    pub const fn is_statement(self) -> bool {
        matches!(
            self,
            Self::Block
                | Self::ExpressionStmt
                | Self::If
                | Self::While
                | Self::DoWhile
                | Self::For
                | Self::ForEach
                | Self::Return
                | Self::Break
                | Self::Continue
                | Self::Throw
                | Self::Try
                | Self::Switch
                | Self::Labeled
                | Self::Synchronized
                | Self::Assert
                | Self::Yield
                | Self::Empty
                | Self::VariableDecl
                | Self::ClassDecl
        )
    }

    /// Kinds usable where a type is expected.
    #[must_use]
    pub const fn is_type(self) -> bool {
        matches!(
            self,
            Self::PrimitiveType
                | Self::TypeName
                | Self::ParameterizedType
                | Self::ArrayType
                | Self::UnionType
                | Self::IntersectionType
                | Self::AnnotatedType
        )
    }

    /// Kinds usable where a pattern is expected.
    #[must_use]
    pub const fn is_pattern(self) -> bool {
        matches!(self, Self::RecordPattern | Self::BindingPattern)
    }

    /// Kinds usable as a member of a class body.
    #[must_use]
    pub const fn is_member(self) -> bool {
        matches!(
            self,
            Self::ClassDecl
                | Self::MethodDecl
                | Self::VariableDecl
                | Self::Initializer
                | Self::Empty
        )
    }

    /// Whether a node of this kind may be installed in a field of `category`.
    #[must_use]
    pub const fn fits(self, category: Category) -> bool {
        match category {
            Category::Any => true,
            Category::Expression => self.is_expression(),
            Category::Statement => self.is_statement(),
            Category::Type => self.is_type(),
            Category::TypeArgument => self.is_type() || matches!(self, Self::Wildcard),
            Category::Pattern => self.is_pattern(),
            Category::CaseLabel => self.is_expression() || self.is_pattern(),
            Category::InstanceOfTarget => self.is_type() || self.is_pattern(),
            Category::ExpressionOrType => self.is_expression() || self.is_type(),
            Category::LambdaBody => self.is_expression() || matches!(self, Self::Block),
            Category::Resource => self.is_expression() || matches!(self, Self::Parameter),
            Category::ForInit => self.is_expression() || matches!(self, Self::VariableDecl),
            Category::ElementValue => {
                self.is_expression() || matches!(self, Self::Annotation | Self::ElementValuePair)
            }
            Category::Member => self.is_member(),
            Category::TypeDecl => matches!(self, Self::ClassDecl),
            Category::Import => matches!(self, Self::Import),
            Category::Package => matches!(self, Self::Package),
            Category::Module => matches!(self, Self::Module),
            Category::Directive => matches!(
                self,
                Self::Requires | Self::Exports | Self::Opens | Self::Uses | Self::Provides
            ),
            Category::Modifiers => matches!(self, Self::Modifiers),
            Category::Annotation => matches!(self, Self::Annotation),
            Category::Parameter => matches!(self, Self::Parameter),
            Category::Declarator => matches!(self, Self::VariableDeclarator),
            Category::TypeParameter => matches!(self, Self::TypeParameter),
            Category::Case => matches!(self, Self::Case),
            Category::Catch => matches!(self, Self::Catch),
            Category::Block => matches!(self, Self::Block),
            Category::ClassBody => matches!(self, Self::ClassBody),
            Category::ArrayInit => matches!(self, Self::ArrayInit),
            Category::EnumConstant => matches!(self, Self::EnumConstant),
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// What a child field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Category {
    Any,
    Expression,
    Statement,
    Type,
    TypeArgument,
    Pattern,
    CaseLabel,
    InstanceOfTarget,
    ExpressionOrType,
    LambdaBody,
    Resource,
    ForInit,
    ElementValue,
    Member,
    TypeDecl,
    Import,
    Package,
    Module,
    Directive,
    Modifiers,
    Annotation,
    Parameter,
    Declarator,
    TypeParameter,
    Case,
    Catch,
    Block,
    ClassBody,
    ArrayInit,
    EnumConstant,
}

/// Operator, literal and wildcard kinds, in one enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[allow(missing_docs)]
pub enum TreeKind {
    // Binary
    Multiply,
    Divide,
    Remainder,
    Plus,
    Minus,
    LeftShift,
    RightShift,
    UnsignedRightShift,
    LessThan,
    GreaterThan,
    LessThanEqual,
    GreaterThanEqual,
    EqualTo,
    NotEqualTo,
    And,
    Xor,
    Or,
    ConditionalAnd,
    ConditionalOr,
    // Unary
    UnaryPlus,
    UnaryMinus,
    BitwiseComplement,
    LogicalComplement,
    PrefixIncrement,
    PrefixDecrement,
    PostfixIncrement,
    PostfixDecrement,
    // Compound assignment
    MultiplyAssignment,
    DivideAssignment,
    RemainderAssignment,
    PlusAssignment,
    MinusAssignment,
    LeftShiftAssignment,
    RightShiftAssignment,
    UnsignedRightShiftAssignment,
    AndAssignment,
    XorAssignment,
    OrAssignment,
    // Literals
    IntLiteral,
    LongLiteral,
    FloatLiteral,
    DoubleLiteral,
    BooleanLiteral,
    CharLiteral,
    StringLiteral,
    TextBlock,
    NullLiteral,
    // Wildcards
    UnboundedWildcard,
    ExtendsWildcard,
    SuperWildcard,
}

/// Operators accepted by a binary expression.
///
/// Shifts are excluded; they mirror from source but cannot be set.
pub const BINARY_OPERATORS: [TreeKind; 16] = [
    TreeKind::Multiply,
    TreeKind::Divide,
    TreeKind::Remainder,
    TreeKind::Plus,
    TreeKind::Minus,
    TreeKind::LessThan,
    TreeKind::GreaterThan,
    TreeKind::LessThanEqual,
    TreeKind::GreaterThanEqual,
    TreeKind::EqualTo,
    TreeKind::NotEqualTo,
    TreeKind::And,
    TreeKind::Xor,
    TreeKind::Or,
    TreeKind::ConditionalAnd,
    TreeKind::ConditionalOr,
];

/// Operators accepted by a unary expression.
pub const UNARY_OPERATORS: [TreeKind; 8] = [
    TreeKind::UnaryPlus,
    TreeKind::UnaryMinus,
    TreeKind::BitwiseComplement,
    TreeKind::LogicalComplement,
    TreeKind::PrefixIncrement,
    TreeKind::PrefixDecrement,
    TreeKind::PostfixIncrement,
    TreeKind::PostfixDecrement,
];

/// Operators accepted by a compound assignment.
pub const COMPOUND_ASSIGNMENT_OPERATORS: [TreeKind; 11] = [
    TreeKind::MultiplyAssignment,
    TreeKind::DivideAssignment,
    TreeKind::RemainderAssignment,
    TreeKind::PlusAssignment,
    TreeKind::MinusAssignment,
    TreeKind::LeftShiftAssignment,
    TreeKind::RightShiftAssignment,
    TreeKind::UnsignedRightShiftAssignment,
    TreeKind::AndAssignment,
    TreeKind::XorAssignment,
    TreeKind::OrAssignment,
];

/// Kinds a literal can be set to. Text blocks mirror but cannot be set.
pub const LITERAL_KINDS: [TreeKind; 8] = [
    TreeKind::IntLiteral,
    TreeKind::LongLiteral,
    TreeKind::FloatLiteral,
    TreeKind::DoubleLiteral,
    TreeKind::BooleanLiteral,
    TreeKind::CharLiteral,
    TreeKind::StringLiteral,
    TreeKind::NullLiteral,
];

/// Kinds a wildcard can be set to.
pub const WILDCARD_KINDS: [TreeKind; 3] = [
    TreeKind::UnboundedWildcard,
    TreeKind::ExtendsWildcard,
    TreeKind::SuperWildcard,
];

impl TreeKind {
    /// Source symbol of an operator kind; empty for non-operators.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Remainder => "%",
            Self::Plus | Self::UnaryPlus => "+",
            Self::Minus | Self::UnaryMinus => "-",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
            Self::UnsignedRightShift => ">>>",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::LessThanEqual => "<=",
            Self::GreaterThanEqual => ">=",
            Self::EqualTo => "==",
            Self::NotEqualTo => "!=",
            Self::And => "&",
            Self::Xor => "^",
            Self::Or => "|",
            Self::ConditionalAnd => "&&",
            Self::ConditionalOr => "||",
            Self::BitwiseComplement => "~",
            Self::LogicalComplement => "!",
            Self::PrefixIncrement | Self::PostfixIncrement => "++",
            Self::PrefixDecrement | Self::PostfixDecrement => "--",
            Self::MultiplyAssignment => "*=",
            Self::DivideAssignment => "/=",
            Self::RemainderAssignment => "%=",
            Self::PlusAssignment => "+=",
            Self::MinusAssignment => "-=",
            Self::LeftShiftAssignment => "<<=",
            Self::RightShiftAssignment => ">>=",
            Self::UnsignedRightShiftAssignment => ">>>=",
            Self::AndAssignment => "&=",
            Self::XorAssignment => "^=",
            Self::OrAssignment => "|=",
            _ => "",
        }
    }

    /// Binary operator for a source symbol, shifts included.
    #[must_use]
    pub fn from_binary_symbol(symbol: &str) -> Option<Self> {
        let kind = match symbol {
            "*" => Self::Multiply,
            "/" => Self::Divide,
            "%" => Self::Remainder,
            "+" => Self::Plus,
            "-" => Self::Minus,
            "<<" => Self::LeftShift,
            ">>" => Self::RightShift,
            ">>>" => Self::UnsignedRightShift,
            "<" => Self::LessThan,
            ">" => Self::GreaterThan,
            "<=" => Self::LessThanEqual,
            ">=" => Self::GreaterThanEqual,
            "==" => Self::EqualTo,
            "!=" => Self::NotEqualTo,
            "&" => Self::And,
            "^" => Self::Xor,
            "|" => Self::Or,
            "&&" => Self::ConditionalAnd,
            "||" => Self::ConditionalOr,
            _ => return None,
        };
        Some(kind)
    }

    /// Unary operator for a source symbol; `prefix` picks `++x` over `x++`.
    #[must_use]
    pub fn from_unary_symbol(symbol: &str, prefix: bool) -> Option<Self> {
        let kind = match (symbol, prefix) {
            ("+", _) => Self::UnaryPlus,
            ("-", _) => Self::UnaryMinus,
            ("~", _) => Self::BitwiseComplement,
            ("!", _) => Self::LogicalComplement,
            ("++", true) => Self::PrefixIncrement,
            ("--", true) => Self::PrefixDecrement,
            ("++", false) => Self::PostfixIncrement,
            ("--", false) => Self::PostfixDecrement,
            _ => return None,
        };
        Some(kind)
    }

    /// Compound assignment operator for a source symbol such as `+=`.
    #[must_use]
    pub fn from_assignment_symbol(symbol: &str) -> Option<Self> {
        COMPOUND_ASSIGNMENT_OPERATORS
            .into_iter()
            .find(|kind| kind.symbol() == symbol)
    }

    /// Whether a unary operator is written after its operand.
    #[must_use]
    pub const fn is_postfix(self) -> bool {
        matches!(self, Self::PostfixIncrement | Self::PostfixDecrement)
    }
}

/// Type kinds; only the primitive subset can be held by a primitive type node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[allow(missing_docs)]
pub enum TypeKind {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
    Void,
    Null,
    Array,
    Declared,
    TypeVar,
    Wildcard,
    None,
    Error,
}

/// Kinds accepted by a primitive type node.
pub const PRIMITIVE_KINDS: [TypeKind; 9] = [
    TypeKind::Boolean,
    TypeKind::Byte,
    TypeKind::Short,
    TypeKind::Int,
    TypeKind::Long,
    TypeKind::Char,
    TypeKind::Float,
    TypeKind::Double,
    TypeKind::Void,
];

impl TypeKind {
    /// Keyword of a primitive kind; empty otherwise.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Char => "char",
            Self::Float => "float",
            Self::Double => "double",
            Self::Void => "void",
            _ => "",
        }
    }

    /// Primitive kind for a keyword.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        PRIMITIVE_KINDS
            .into_iter()
            .find(|kind| kind.keyword() == keyword)
    }
}

/// Declaration modifiers, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[allow(missing_docs)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Default,
    Static,
    Sealed,
    NonSealed,
    Final,
    Transient,
    Volatile,
    Synchronized,
    Native,
    Strictfp,
}

impl Modifier {
    /// Keyword as written in source.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
            Self::Abstract => "abstract",
            Self::Default => "default",
            Self::Static => "static",
            Self::Sealed => "sealed",
            Self::NonSealed => "non-sealed",
            Self::Final => "final",
            Self::Transient => "transient",
            Self::Volatile => "volatile",
            Self::Synchronized => "synchronized",
            Self::Native => "native",
            Self::Strictfp => "strictfp",
        }
    }

    /// Modifier for a keyword.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let modifier = match keyword {
            "public" => Self::Public,
            "protected" => Self::Protected,
            "private" => Self::Private,
            "abstract" => Self::Abstract,
            "default" => Self::Default,
            "static" => Self::Static,
            "sealed" => Self::Sealed,
            "non-sealed" => Self::NonSealed,
            "final" => Self::Final,
            "transient" => Self::Transient,
            "volatile" => Self::Volatile,
            "synchronized" => Self::Synchronized,
            "native" => Self::Native,
            "strictfp" => Self::Strictfp,
            _ => return None,
        };
        Some(modifier)
    }
}

/// Flavour of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[allow(missing_docs)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

impl ClassKind {
    /// Declaration keyword.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Record => "record",
            Self::Annotation => "@interface",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_subset_excludes_shifts() {
        assert_eq!(BINARY_OPERATORS.len(), 16);
        assert!(!BINARY_OPERATORS.contains(&TreeKind::LeftShift));
        assert!(!BINARY_OPERATORS.contains(&TreeKind::LeftShiftAssignment));
        assert!(BINARY_OPERATORS.contains(&TreeKind::ConditionalOr));
    }

    #[test]
    fn test_symbol_round_trip() {
        for kind in BINARY_OPERATORS {
            assert_eq!(TreeKind::from_binary_symbol(kind.symbol()), Some(kind));
        }
        assert_eq!(
            TreeKind::from_assignment_symbol(">>>="),
            Some(TreeKind::UnsignedRightShiftAssignment)
        );
        assert_eq!(
            TreeKind::from_unary_symbol("++", false),
            Some(TreeKind::PostfixIncrement)
        );
    }

    #[test]
    fn test_from_cst_kind() {
        assert_eq!(
            NodeKind::from_cst_kind("enum_declaration"),
            Some(NodeKind::ClassDecl)
        );
        assert_eq!(
            NodeKind::from_cst_kind("update_expression"),
            Some(NodeKind::Unary)
        );
        assert_eq!(NodeKind::from_cst_kind("template_expression"), None);
        assert_eq!(NodeKind::from_cst_kind("line_comment"), None);
    }

    #[test]
    fn test_categories() {
        assert!(NodeKind::Binary.fits(Category::Expression));
        assert!(!NodeKind::Binary.fits(Category::Statement));
        assert!(NodeKind::Switch.fits(Category::Statement));
        assert!(NodeKind::Switch.fits(Category::Expression));
        assert!(NodeKind::Wildcard.fits(Category::TypeArgument));
        assert!(!NodeKind::Wildcard.fits(Category::Type));
        assert!(NodeKind::Block.fits(Category::LambdaBody));
    }

    #[test]
    fn test_primitive_keywords() {
        assert_eq!(TypeKind::from_keyword("double"), Some(TypeKind::Double));
        assert_eq!(TypeKind::from_keyword("var"), None);
        assert_eq!(TypeKind::Declared.keyword(), "");
    }
}
