//! Node payloads.
//!
//! [`NodeData`] is the closed set of kind-specific payloads held by arena
//! nodes. Child links are [`NodeId`]s; names are kept as [`CompactString`]s
//! because most identifiers are short.

use compact_str::CompactString;
use serde::Serialize;
use smallvec::SmallVec;

use super::kind::{Category, ClassKind, Modifier, NodeKind, TreeKind, TypeKind};
use crate::cst::CstId;

/// Handle of a node in a [`super::CompilationUnit`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a node contributes to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Action {
    /// Copy the original text through.
    NoChange,
    /// Re-render through the structured writer.
    Change,
    /// Emit nothing.
    Ignore,
}

/// An arena slot: payload plus edit state.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) data: NodeData,
    pub(crate) parent: Option<NodeId>,
    pub(crate) action: Action,
    pub(crate) dirty: bool,
    pub(crate) original: Option<CstId>,
}

impl Node {
    pub(crate) fn new(data: NodeData, original: Option<CstId>) -> Self {
        let action = if original.is_some() {
            Action::NoChange
        } else {
            Action::Change
        };
        Self {
            data,
            parent: None,
            action,
            dirty: false,
            original,
        }
    }

    /// Kind-specific payload.
    #[must_use]
    pub fn data(&self) -> &NodeData {
        &self.data
    }

    /// Node kind.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    /// The node listing this one as a child.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Current action.
    #[must_use]
    pub fn action(&self) -> Action {
        self.action
    }

    /// Whether this node or anything below it was edited.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Immutable node this one mirrors.
    #[must_use]
    pub fn original(&self) -> Option<CstId> {
        self.original
    }

    /// Whether the node was built by hand rather than mirrored.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.original.is_none()
    }
}

/// Value of a literal, typed by its literal kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[allow(missing_docs)]
pub enum LiteralValue {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    Char(char),
    String(String),
}

impl LiteralValue {
    /// Literal kind matching this value.
    #[must_use]
    pub const fn kind(&self) -> TreeKind {
        match self {
            Self::Int(_) => TreeKind::IntLiteral,
            Self::Long(_) => TreeKind::LongLiteral,
            Self::Float(_) => TreeKind::FloatLiteral,
            Self::Double(_) => TreeKind::DoubleLiteral,
            Self::Boolean(_) => TreeKind::BooleanLiteral,
            Self::Char(_) => TreeKind::CharLiteral,
            Self::String(_) => TreeKind::StringLiteral,
        }
    }
}

/// Child-bearing fields, addressed by name from editing code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[allow(missing_docs)]
pub enum Field {
    Package,
    Imports,
    Types,
    Module,
    Annotations,
    Directives,
    Modifiers,
    TypeParameters,
    RecordComponents,
    Extends,
    Implements,
    Permits,
    EnumConstants,
    Members,
    Arguments,
    Body,
    ReturnType,
    Parameters,
    Throws,
    DefaultValue,
    Type,
    Declarators,
    Init,
    Value,
    Bounds,
    Statements,
    Expression,
    Condition,
    ThenBranch,
    ElseBranch,
    Update,
    Resources,
    Catches,
    Finally,
    Parameter,
    Selector,
    Cases,
    Labels,
    Guard,
    Lock,
    Detail,
    Target,
    TypeArguments,
    ClassType,
    Outer,
    Dimensions,
    Initializer,
    Elements,
    Left,
    Right,
    Operand,
    ThenValue,
    ElseValue,
    Array,
    Index,
    Components,
    Base,
    Element,
    Bound,
    Alternatives,
}

impl Field {
    /// Field name in `snake_case`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Imports => "imports",
            Self::Types => "types",
            Self::Module => "module",
            Self::Annotations => "annotations",
            Self::Directives => "directives",
            Self::Modifiers => "modifiers",
            Self::TypeParameters => "type_parameters",
            Self::RecordComponents => "record_components",
            Self::Extends => "extends",
            Self::Implements => "implements",
            Self::Permits => "permits",
            Self::EnumConstants => "enum_constants",
            Self::Members => "members",
            Self::Arguments => "arguments",
            Self::Body => "body",
            Self::ReturnType => "return_type",
            Self::Parameters => "parameters",
            Self::Throws => "throws",
            Self::DefaultValue => "default_value",
            Self::Type => "type",
            Self::Declarators => "declarators",
            Self::Init => "init",
            Self::Value => "value",
            Self::Bounds => "bounds",
            Self::Statements => "statements",
            Self::Expression => "expression",
            Self::Condition => "condition",
            Self::ThenBranch => "then_branch",
            Self::ElseBranch => "else_branch",
            Self::Update => "update",
            Self::Resources => "resources",
            Self::Catches => "catches",
            Self::Finally => "finally",
            Self::Parameter => "parameter",
            Self::Selector => "selector",
            Self::Cases => "cases",
            Self::Labels => "labels",
            Self::Guard => "guard",
            Self::Lock => "lock",
            Self::Detail => "detail",
            Self::Target => "target",
            Self::TypeArguments => "type_arguments",
            Self::ClassType => "class_type",
            Self::Outer => "outer",
            Self::Dimensions => "dimensions",
            Self::Initializer => "initializer",
            Self::Elements => "elements",
            Self::Left => "left",
            Self::Right => "right",
            Self::Operand => "operand",
            Self::ThenValue => "then_value",
            Self::ElseValue => "else_value",
            Self::Array => "array",
            Self::Index => "index",
            Self::Components => "components",
            Self::Base => "base",
            Self::Element => "element",
            Self::Bound => "bound",
            Self::Alternatives => "alternatives",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable view of one child field.
pub(crate) enum Slot<'a> {
    Required(&'a mut NodeId, Category),
    Optional(&'a mut Option<NodeId>, Category),
    List(&'a mut Vec<NodeId>, Category),
}

/// Kind-specific payload of a node.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum NodeData {
    CompilationUnit {
        package: Option<NodeId>,
        imports: Vec<NodeId>,
        types: Vec<NodeId>,
        module: Option<NodeId>,
    },
    Package {
        annotations: Vec<NodeId>,
        name: CompactString,
    },
    Import {
        name: CompactString,
        is_static: bool,
        on_demand: bool,
    },
    Module {
        annotations: Vec<NodeId>,
        open: bool,
        name: CompactString,
        directives: Vec<NodeId>,
    },
    Requires {
        is_static: bool,
        is_transitive: bool,
        module: CompactString,
    },
    Exports {
        package: CompactString,
        modules: Vec<CompactString>,
    },
    Opens {
        package: CompactString,
        modules: Vec<CompactString>,
    },
    Uses {
        service: CompactString,
    },
    Provides {
        service: CompactString,
        implementations: Vec<CompactString>,
    },
    ClassDecl {
        modifiers: Option<NodeId>,
        kind: ClassKind,
        name: CompactString,
        type_parameters: Vec<NodeId>,
        record_components: Vec<NodeId>,
        extends: Vec<NodeId>,
        implements: Vec<NodeId>,
        permits: Vec<NodeId>,
        enum_constants: Vec<NodeId>,
        members: Vec<NodeId>,
    },
    ClassBody {
        members: Vec<NodeId>,
    },
    EnumConstant {
        modifiers: Option<NodeId>,
        name: CompactString,
        arguments: Vec<NodeId>,
        body: Option<NodeId>,
    },
    /// Methods, constructors (no return type) and annotation elements.
    MethodDecl {
        modifiers: Option<NodeId>,
        type_parameters: Vec<NodeId>,
        return_type: Option<NodeId>,
        name: CompactString,
        parameters: Vec<NodeId>,
        throws: Vec<NodeId>,
        default_value: Option<NodeId>,
        body: Option<NodeId>,
        /// Record canonical constructor written without a parameter list.
        compact: bool,
    },
    /// Fields and local variables.
    VariableDecl {
        modifiers: Option<NodeId>,
        ty: NodeId,
        declarators: Vec<NodeId>,
    },
    VariableDeclarator {
        name: CompactString,
        dimensions: u8,
        init: Option<NodeId>,
    },
    /// Formal, catch, lambda and resource parameters, and record components.
    Parameter {
        modifiers: Option<NodeId>,
        ty: Option<NodeId>,
        varargs: bool,
        name: CompactString,
        dimensions: u8,
        init: Option<NodeId>,
    },
    Initializer {
        is_static: bool,
        body: NodeId,
    },
    Modifiers {
        flags: Vec<Modifier>,
        annotations: Vec<NodeId>,
    },
    Annotation {
        name: CompactString,
        arguments: Vec<NodeId>,
    },
    ElementValuePair {
        key: CompactString,
        value: NodeId,
    },
    TypeParameter {
        annotations: Vec<NodeId>,
        name: CompactString,
        bounds: Vec<NodeId>,
    },
    Block {
        statements: Vec<NodeId>,
    },
    ExpressionStmt {
        expression: NodeId,
    },
    If {
        condition: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
    },
    While {
        condition: NodeId,
        body: NodeId,
    },
    DoWhile {
        body: NodeId,
        condition: NodeId,
    },
    For {
        init: Vec<NodeId>,
        condition: Option<NodeId>,
        update: Vec<NodeId>,
        body: NodeId,
    },
    ForEach {
        modifiers: Option<NodeId>,
        ty: NodeId,
        name: CompactString,
        expression: NodeId,
        body: NodeId,
    },
    Return {
        expression: Option<NodeId>,
    },
    Break {
        label: Option<CompactString>,
    },
    Continue {
        label: Option<CompactString>,
    },
    Throw {
        expression: NodeId,
    },
    Try {
        resources: Vec<NodeId>,
        body: NodeId,
        catches: Vec<NodeId>,
        finally: Option<NodeId>,
    },
    Catch {
        parameter: NodeId,
        body: NodeId,
    },
    /// Switch statements and switch expressions.
    Switch {
        selector: NodeId,
        cases: Vec<NodeId>,
    },
    /// A `case`/`default` group or rule; empty `labels` with `is_default`
    /// is a bare `default`.
    Case {
        labels: Vec<NodeId>,
        is_default: bool,
        guard: Option<NodeId>,
        rule: bool,
        statements: Vec<NodeId>,
    },
    Labeled {
        label: CompactString,
        body: NodeId,
    },
    Synchronized {
        lock: NodeId,
        body: NodeId,
    },
    Assert {
        condition: NodeId,
        detail: Option<NodeId>,
    },
    Yield {
        value: NodeId,
    },
    Empty,
    /// Identifiers, `this` and `super`.
    Ident {
        name: CompactString,
    },
    FieldAccess {
        target: NodeId,
        name: CompactString,
    },
    MethodInvocation {
        target: Option<NodeId>,
        type_arguments: Vec<NodeId>,
        name: CompactString,
        arguments: Vec<NodeId>,
    },
    NewClass {
        outer: Option<NodeId>,
        type_arguments: Vec<NodeId>,
        class_type: NodeId,
        arguments: Vec<NodeId>,
        body: Option<NodeId>,
    },
    NewArray {
        element_type: Option<NodeId>,
        dimensions: Vec<NodeId>,
        extra_dims: u8,
        initializer: Option<NodeId>,
    },
    ArrayInit {
        elements: Vec<NodeId>,
    },
    Literal {
        kind: TreeKind,
        value: Option<LiteralValue>,
    },
    Binary {
        operator: TreeKind,
        left: NodeId,
        right: NodeId,
    },
    Unary {
        operator: TreeKind,
        operand: NodeId,
    },
    Assignment {
        target: NodeId,
        value: NodeId,
    },
    CompoundAssignment {
        operator: TreeKind,
        target: NodeId,
        value: NodeId,
    },
    Conditional {
        condition: NodeId,
        then_value: NodeId,
        else_value: NodeId,
    },
    Parens {
        expression: NodeId,
    },
    TypeCast {
        types: Vec<NodeId>,
        expression: NodeId,
    },
    InstanceOf {
        expression: NodeId,
        target: NodeId,
        binding: Option<CompactString>,
        is_final: bool,
    },
    ArrayAccess {
        array: NodeId,
        index: NodeId,
    },
    Lambda {
        parameters: Vec<NodeId>,
        parenthesized: bool,
        body: NodeId,
    },
    MemberReference {
        target: NodeId,
        type_arguments: Vec<NodeId>,
        name: CompactString,
    },
    RecordPattern {
        ty: NodeId,
        components: Vec<NodeId>,
    },
    BindingPattern {
        modifiers: Option<NodeId>,
        ty: Option<NodeId>,
        name: CompactString,
    },
    PrimitiveType {
        kind: TypeKind,
    },
    TypeName {
        name: CompactString,
    },
    ParameterizedType {
        base: NodeId,
        type_arguments: Vec<NodeId>,
    },
    ArrayType {
        element: NodeId,
        dimensions: u8,
    },
    Wildcard {
        kind: TreeKind,
        bound: Option<NodeId>,
    },
    UnionType {
        alternatives: Vec<NodeId>,
    },
    IntersectionType {
        bounds: Vec<NodeId>,
    },
    AnnotatedType {
        annotations: Vec<NodeId>,
        ty: NodeId,
    },
}

impl NodeData {
    /// Kind of this payload.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::CompilationUnit { .. } => NodeKind::CompilationUnit,
            Self::Package { .. } => NodeKind::Package,
            Self::Import { .. } => NodeKind::Import,
            Self::Module { .. } => NodeKind::Module,
            Self::Requires { .. } => NodeKind::Requires,
            Self::Exports { .. } => NodeKind::Exports,
            Self::Opens { .. } => NodeKind::Opens,
            Self::Uses { .. } => NodeKind::Uses,
            Self::Provides { .. } => NodeKind::Provides,
            Self::ClassDecl { .. } => NodeKind::ClassDecl,
            Self::ClassBody { .. } => NodeKind::ClassBody,
            Self::EnumConstant { .. } => NodeKind::EnumConstant,
            Self::MethodDecl { .. } => NodeKind::MethodDecl,
            Self::VariableDecl { .. } => NodeKind::VariableDecl,
            Self::VariableDeclarator { .. } => NodeKind::VariableDeclarator,
            Self::Parameter { .. } => NodeKind::Parameter,
            Self::Initializer { .. } => NodeKind::Initializer,
            Self::Modifiers { .. } => NodeKind::Modifiers,
            Self::Annotation { .. } => NodeKind::Annotation,
            Self::ElementValuePair { .. } => NodeKind::ElementValuePair,
            Self::TypeParameter { .. } => NodeKind::TypeParameter,
            Self::Block { .. } => NodeKind::Block,
            Self::ExpressionStmt { .. } => NodeKind::ExpressionStmt,
            Self::If { .. } => NodeKind::If,
            Self::While { .. } => NodeKind::While,
            Self::DoWhile { .. } => NodeKind::DoWhile,
            Self::For { .. } => NodeKind::For,
            Self::ForEach { .. } => NodeKind::ForEach,
            Self::Return { .. } => NodeKind::Return,
            Self::Break { .. } => NodeKind::Break,
            Self::Continue { .. } => NodeKind::Continue,
            Self::Throw { .. } => NodeKind::Throw,
            Self::Try { .. } => NodeKind::Try,
            Self::Catch { .. } => NodeKind::Catch,
            Self::Switch { .. } => NodeKind::Switch,
            Self::Case { .. } => NodeKind::Case,
            Self::Labeled { .. } => NodeKind::Labeled,
            Self::Synchronized { .. } => NodeKind::Synchronized,
            Self::Assert { .. } => NodeKind::Assert,
            Self::Yield { .. } => NodeKind::Yield,
            Self::Empty => NodeKind::Empty,
            Self::Ident { .. } => NodeKind::Ident,
            Self::FieldAccess { .. } => NodeKind::FieldAccess,
            Self::MethodInvocation { .. } => NodeKind::MethodInvocation,
            Self::NewClass { .. } => NodeKind::NewClass,
            Self::NewArray { .. } => NodeKind::NewArray,
            Self::ArrayInit { .. } => NodeKind::ArrayInit,
            Self::Literal { .. } => NodeKind::Literal,
            Self::Binary { .. } => NodeKind::Binary,
            Self::Unary { .. } => NodeKind::Unary,
            Self::Assignment { .. } => NodeKind::Assignment,
            Self::CompoundAssignment { .. } => NodeKind::CompoundAssignment,
            Self::Conditional { .. } => NodeKind::Conditional,
            Self::Parens { .. } => NodeKind::Parens,
            Self::TypeCast { .. } => NodeKind::TypeCast,
            Self::InstanceOf { .. } => NodeKind::InstanceOf,
            Self::ArrayAccess { .. } => NodeKind::ArrayAccess,
            Self::Lambda { .. } => NodeKind::Lambda,
            Self::MemberReference { .. } => NodeKind::MemberReference,
            Self::RecordPattern { .. } => NodeKind::RecordPattern,
            Self::BindingPattern { .. } => NodeKind::BindingPattern,
            Self::PrimitiveType { .. } => NodeKind::PrimitiveType,
            Self::TypeName { .. } => NodeKind::TypeName,
            Self::ParameterizedType { .. } => NodeKind::ParameterizedType,
            Self::ArrayType { .. } => NodeKind::ArrayType,
            Self::Wildcard { .. } => NodeKind::Wildcard,
            Self::UnionType { .. } => NodeKind::UnionType,
            Self::IntersectionType { .. } => NodeKind::IntersectionType,
            Self::AnnotatedType { .. } => NodeKind::AnnotatedType,
        }
    }

    /// Child fields of this kind, in source order.
    #[must_use]
    pub fn fields(&self) -> &'static [Field] {
        use Field as F;
        match self {
            Self::CompilationUnit { .. } => &[F::Package, F::Imports, F::Types, F::Module],
            Self::Package { .. } | Self::Modifiers { .. } => &[F::Annotations],
            Self::Module { .. } => &[F::Annotations, F::Directives],
            Self::ClassDecl { .. } => &[
                F::Modifiers,
                F::TypeParameters,
                F::RecordComponents,
                F::Extends,
                F::Implements,
                F::Permits,
                F::EnumConstants,
                F::Members,
            ],
            Self::ClassBody { .. } => &[F::Members],
            Self::EnumConstant { .. } => &[F::Modifiers, F::Arguments, F::Body],
            Self::MethodDecl { .. } => &[
                F::Modifiers,
                F::TypeParameters,
                F::ReturnType,
                F::Parameters,
                F::Throws,
                F::DefaultValue,
                F::Body,
            ],
            Self::VariableDecl { .. } => &[F::Modifiers, F::Type, F::Declarators],
            Self::VariableDeclarator { .. } => &[F::Init],
            Self::Parameter { .. } => &[F::Modifiers, F::Type, F::Init],
            Self::Initializer { .. } | Self::Labeled { .. } => &[F::Body],
            Self::Annotation { .. } => &[F::Arguments],
            Self::ElementValuePair { .. } | Self::Yield { .. } => &[F::Value],
            Self::TypeParameter { .. } => &[F::Annotations, F::Bounds],
            Self::Block { .. } => &[F::Statements],
            Self::ExpressionStmt { .. }
            | Self::Return { .. }
            | Self::Throw { .. }
            | Self::Parens { .. } => &[F::Expression],
            Self::If { .. } => &[F::Condition, F::ThenBranch, F::ElseBranch],
            Self::While { .. } => &[F::Condition, F::Body],
            Self::DoWhile { .. } => &[F::Body, F::Condition],
            Self::For { .. } => &[F::Init, F::Condition, F::Update, F::Body],
            Self::ForEach { .. } => &[F::Modifiers, F::Type, F::Expression, F::Body],
            Self::Try { .. } => &[F::Resources, F::Body, F::Catches, F::Finally],
            Self::Catch { .. } => &[F::Parameter, F::Body],
            Self::Switch { .. } => &[F::Selector, F::Cases],
            Self::Case { .. } => &[F::Labels, F::Guard, F::Statements],
            Self::Synchronized { .. } => &[F::Lock, F::Body],
            Self::Assert { .. } => &[F::Condition, F::Detail],
            Self::FieldAccess { .. } => &[F::Target],
            Self::MethodInvocation { .. } => &[F::Target, F::TypeArguments, F::Arguments],
            Self::NewClass { .. } => &[
                F::Outer,
                F::TypeArguments,
                F::ClassType,
                F::Arguments,
                F::Body,
            ],
            Self::NewArray { .. } => &[F::Type, F::Dimensions, F::Initializer],
            Self::ArrayInit { .. } => &[F::Elements],
            Self::Binary { .. } => &[F::Left, F::Right],
            Self::Unary { .. } => &[F::Operand],
            Self::Assignment { .. } | Self::CompoundAssignment { .. } => &[F::Target, F::Value],
            Self::Conditional { .. } => &[F::Condition, F::ThenValue, F::ElseValue],
            Self::TypeCast { .. } => &[F::Types, F::Expression],
            Self::InstanceOf { .. } => &[F::Expression, F::Target],
            Self::ArrayAccess { .. } => &[F::Array, F::Index],
            Self::Lambda { .. } => &[F::Parameters, F::Body],
            Self::MemberReference { .. } => &[F::Target, F::TypeArguments],
            Self::RecordPattern { .. } => &[F::Type, F::Components],
            Self::BindingPattern { .. } => &[F::Modifiers, F::Type],
            Self::ParameterizedType { .. } => &[F::Base, F::TypeArguments],
            Self::ArrayType { .. } => &[F::Element],
            Self::Wildcard { .. } => &[F::Bound],
            Self::UnionType { .. } => &[F::Alternatives],
            Self::IntersectionType { .. } => &[F::Bounds],
            Self::AnnotatedType { .. } => &[F::Annotations, F::Type],
            Self::Import { .. }
            | Self::Requires { .. }
            | Self::Exports { .. }
            | Self::Opens { .. }
            | Self::Uses { .. }
            | Self::Provides { .. }
            | Self::Break { .. }
            | Self::Continue { .. }
            | Self::Empty
            | Self::Ident { .. }
            | Self::Literal { .. }
            | Self::PrimitiveType { .. }
            | Self::TypeName { .. } => &[],
        }
    }

    /// Direct children in source order.
    #[must_use]
    pub fn children(&self) -> SmallVec<[NodeId; 4]> {
        fn one(id: &Option<NodeId>, out: &mut SmallVec<[NodeId; 4]>) {
            if let Some(id) = id {
                out.push(*id);
            }
        }

        let mut out = SmallVec::new();
        match self {
            Self::CompilationUnit {
                package,
                imports,
                types,
                module,
            } => {
                one(package, &mut out);
                out.extend_from_slice(imports);
                out.extend_from_slice(types);
                one(module, &mut out);
            }
            Self::Package { annotations, .. } | Self::Modifiers { annotations, .. } => {
                out.extend_from_slice(annotations);
            }
            Self::Module {
                annotations,
                directives,
                ..
            } => {
                out.extend_from_slice(annotations);
                out.extend_from_slice(directives);
            }
            Self::ClassDecl {
                modifiers,
                type_parameters,
                record_components,
                extends,
                implements,
                permits,
                enum_constants,
                members,
                ..
            } => {
                one(modifiers, &mut out);
                for list in [
                    type_parameters,
                    record_components,
                    extends,
                    implements,
                    permits,
                    enum_constants,
                    members,
                ] {
                    out.extend_from_slice(list);
                }
            }
            Self::ClassBody { members } => out.extend_from_slice(members),
            Self::EnumConstant {
                modifiers,
                arguments,
                body,
                ..
            } => {
                one(modifiers, &mut out);
                out.extend_from_slice(arguments);
                one(body, &mut out);
            }
            Self::MethodDecl {
                modifiers,
                type_parameters,
                return_type,
                parameters,
                throws,
                default_value,
                body,
                ..
            } => {
                one(modifiers, &mut out);
                out.extend_from_slice(type_parameters);
                one(return_type, &mut out);
                out.extend_from_slice(parameters);
                out.extend_from_slice(throws);
                one(default_value, &mut out);
                one(body, &mut out);
            }
            Self::VariableDecl {
                modifiers,
                ty,
                declarators,
            } => {
                one(modifiers, &mut out);
                out.push(*ty);
                out.extend_from_slice(declarators);
            }
            Self::VariableDeclarator { init, .. } => one(init, &mut out),
            Self::Parameter {
                modifiers, ty, init, ..
            } => {
                one(modifiers, &mut out);
                one(ty, &mut out);
                one(init, &mut out);
            }
            Self::Initializer { body, .. } | Self::Labeled { body, .. } => out.push(*body),
            Self::Annotation { arguments, .. } => out.extend_from_slice(arguments),
            Self::ElementValuePair { value, .. } | Self::Yield { value } => out.push(*value),
            Self::TypeParameter {
                annotations,
                bounds,
                ..
            } => {
                out.extend_from_slice(annotations);
                out.extend_from_slice(bounds);
            }
            Self::Block { statements } => out.extend_from_slice(statements),
            Self::ExpressionStmt { expression }
            | Self::Throw { expression }
            | Self::Parens { expression } => out.push(*expression),
            Self::If {
                condition,
                then_branch,
                else_branch,
            } => {
                out.push(*condition);
                out.push(*then_branch);
                one(else_branch, &mut out);
            }
            Self::While { condition, body } => {
                out.push(*condition);
                out.push(*body);
            }
            Self::DoWhile { body, condition } => {
                out.push(*body);
                out.push(*condition);
            }
            Self::For {
                init,
                condition,
                update,
                body,
            } => {
                out.extend_from_slice(init);
                one(condition, &mut out);
                out.extend_from_slice(update);
                out.push(*body);
            }
            Self::ForEach {
                modifiers,
                ty,
                expression,
                body,
                ..
            } => {
                one(modifiers, &mut out);
                out.push(*ty);
                out.push(*expression);
                out.push(*body);
            }
            Self::Return { expression } => one(expression, &mut out),
            Self::Try {
                resources,
                body,
                catches,
                finally,
            } => {
                out.extend_from_slice(resources);
                out.push(*body);
                out.extend_from_slice(catches);
                one(finally, &mut out);
            }
            Self::Catch { parameter, body } => {
                out.push(*parameter);
                out.push(*body);
            }
            Self::Switch { selector, cases } => {
                out.push(*selector);
                out.extend_from_slice(cases);
            }
            Self::Case {
                labels,
                guard,
                statements,
                ..
            } => {
                out.extend_from_slice(labels);
                one(guard, &mut out);
                out.extend_from_slice(statements);
            }
            Self::Synchronized { lock, body } => {
                out.push(*lock);
                out.push(*body);
            }
            Self::Assert { condition, detail } => {
                out.push(*condition);
                one(detail, &mut out);
            }
            Self::FieldAccess { target, .. } => out.push(*target),
            Self::MethodInvocation {
                target,
                type_arguments,
                arguments,
                ..
            } => {
                one(target, &mut out);
                out.extend_from_slice(type_arguments);
                out.extend_from_slice(arguments);
            }
            Self::NewClass {
                outer,
                type_arguments,
                class_type,
                arguments,
                body,
            } => {
                one(outer, &mut out);
                out.extend_from_slice(type_arguments);
                out.push(*class_type);
                out.extend_from_slice(arguments);
                one(body, &mut out);
            }
            Self::NewArray {
                element_type,
                dimensions,
                initializer,
                ..
            } => {
                one(element_type, &mut out);
                out.extend_from_slice(dimensions);
                one(initializer, &mut out);
            }
            Self::ArrayInit { elements } => out.extend_from_slice(elements),
            Self::Binary { left, right, .. } => {
                out.push(*left);
                out.push(*right);
            }
            Self::Unary { operand, .. } => out.push(*operand),
            Self::Assignment { target, value } | Self::CompoundAssignment { target, value, .. } => {
                out.push(*target);
                out.push(*value);
            }
            Self::Conditional {
                condition,
                then_value,
                else_value,
            } => {
                out.push(*condition);
                out.push(*then_value);
                out.push(*else_value);
            }
            Self::TypeCast { types, expression } => {
                out.extend_from_slice(types);
                out.push(*expression);
            }
            Self::InstanceOf {
                expression, target, ..
            } => {
                out.push(*expression);
                out.push(*target);
            }
            Self::ArrayAccess { array, index } => {
                out.push(*array);
                out.push(*index);
            }
            Self::Lambda {
                parameters, body, ..
            } => {
                out.extend_from_slice(parameters);
                out.push(*body);
            }
            Self::MemberReference {
                target,
                type_arguments,
                ..
            } => {
                out.push(*target);
                out.extend_from_slice(type_arguments);
            }
            Self::RecordPattern { ty, components } => {
                out.push(*ty);
                out.extend_from_slice(components);
            }
            Self::BindingPattern { modifiers, ty, .. } => {
                one(modifiers, &mut out);
                one(ty, &mut out);
            }
            Self::ParameterizedType {
                base,
                type_arguments,
            } => {
                out.push(*base);
                out.extend_from_slice(type_arguments);
            }
            Self::ArrayType { element, .. } => out.push(*element),
            Self::Wildcard { bound, .. } => one(bound, &mut out),
            Self::UnionType { alternatives } => out.extend_from_slice(alternatives),
            Self::IntersectionType { bounds } => out.extend_from_slice(bounds),
            Self::AnnotatedType { annotations, ty } => {
                out.extend_from_slice(annotations);
                out.push(*ty);
            }
            Self::Import { .. }
            | Self::Requires { .. }
            | Self::Exports { .. }
            | Self::Opens { .. }
            | Self::Uses { .. }
            | Self::Provides { .. }
            | Self::Break { .. }
            | Self::Continue { .. }
            | Self::Empty
            | Self::Ident { .. }
            | Self::Literal { .. }
            | Self::PrimitiveType { .. }
            | Self::TypeName { .. } => {}
        }
        out
    }

    /// Mutable access to a child field, with what it accepts.
    #[allow(clippy::too_many_lines)]
    pub(crate) fn slot_mut(&mut self, field: Field) -> Option<Slot<'_>> {
        use Category as C;
        use Field as F;
        use Slot::{List, Optional, Required};

        let slot = match (self, field) {
            (Self::CompilationUnit { package, .. }, F::Package) => Optional(package, C::Package),
            (Self::CompilationUnit { imports, .. }, F::Imports) => List(imports, C::Import),
            (Self::CompilationUnit { types, .. }, F::Types) => List(types, C::TypeDecl),
            (Self::CompilationUnit { module, .. }, F::Module) => Optional(module, C::Module),
            (
                Self::Package { annotations, .. }
                | Self::Module { annotations, .. }
                | Self::Modifiers { annotations, .. }
                | Self::TypeParameter { annotations, .. }
                | Self::AnnotatedType { annotations, .. },
                F::Annotations,
            ) => List(annotations, C::Annotation),
            (Self::Module { directives, .. }, F::Directives) => List(directives, C::Directive),
            (
                Self::ClassDecl { modifiers, .. }
                | Self::EnumConstant { modifiers, .. }
                | Self::MethodDecl { modifiers, .. }
                | Self::VariableDecl { modifiers, .. }
                | Self::Parameter { modifiers, .. }
                | Self::ForEach { modifiers, .. }
                | Self::BindingPattern { modifiers, .. },
                F::Modifiers,
            ) => Optional(modifiers, C::Modifiers),
            (
                Self::ClassDecl {
                    type_parameters, ..
                }
                | Self::MethodDecl {
                    type_parameters, ..
                },
                F::TypeParameters,
            ) => List(type_parameters, C::TypeParameter),
            (
                Self::ClassDecl {
                    record_components, ..
                },
                F::RecordComponents,
            ) => List(record_components, C::Parameter),
            (Self::ClassDecl { extends, .. }, F::Extends) => List(extends, C::Type),
            (Self::ClassDecl { implements, .. }, F::Implements) => List(implements, C::Type),
            (Self::ClassDecl { permits, .. }, F::Permits) => List(permits, C::Type),
            (Self::ClassDecl { enum_constants, .. }, F::EnumConstants) => {
                List(enum_constants, C::EnumConstant)
            }
            (Self::ClassDecl { members, .. } | Self::ClassBody { members }, F::Members) => {
                List(members, C::Member)
            }
            (
                Self::EnumConstant { arguments, .. }
                | Self::MethodInvocation { arguments, .. }
                | Self::NewClass { arguments, .. },
                F::Arguments,
            ) => List(arguments, C::Expression),
            (Self::Annotation { arguments, .. }, F::Arguments) => {
                List(arguments, C::ElementValue)
            }
            (Self::EnumConstant { body, .. } | Self::NewClass { body, .. }, F::Body) => {
                Optional(body, C::ClassBody)
            }
            (Self::MethodDecl { body, .. }, F::Body) => Optional(body, C::Block),
            (
                Self::Initializer { body, .. }
                | Self::Catch { body, .. }
                | Self::Synchronized { body, .. }
                | Self::Try { body, .. },
                F::Body,
            ) => Required(body, C::Block),
            (
                Self::While { body, .. }
                | Self::DoWhile { body, .. }
                | Self::For { body, .. }
                | Self::ForEach { body, .. }
                | Self::Labeled { body, .. },
                F::Body,
            ) => Required(body, C::Statement),
            (Self::Lambda { body, .. }, F::Body) => Required(body, C::LambdaBody),
            (Self::MethodDecl { return_type, .. }, F::ReturnType) => {
                Optional(return_type, C::Type)
            }
            (
                Self::MethodDecl { parameters, .. } | Self::Lambda { parameters, .. },
                F::Parameters,
            ) => List(parameters, C::Parameter),
            (Self::MethodDecl { throws, .. }, F::Throws) => List(throws, C::Type),
            (Self::MethodDecl { default_value, .. }, F::DefaultValue) => {
                Optional(default_value, C::ElementValue)
            }
            (
                Self::VariableDecl { ty, .. }
                | Self::ForEach { ty, .. }
                | Self::RecordPattern { ty, .. }
                | Self::AnnotatedType { ty, .. },
                F::Type,
            ) => Required(ty, C::Type),
            (Self::Parameter { ty, .. } | Self::BindingPattern { ty, .. }, F::Type) => {
                Optional(ty, C::Type)
            }
            (Self::NewArray { element_type, .. }, F::Type) => Optional(element_type, C::Type),
            (Self::VariableDecl { declarators, .. }, F::Declarators) => {
                List(declarators, C::Declarator)
            }
            (Self::VariableDeclarator { init, .. } | Self::Parameter { init, .. }, F::Init) => {
                Optional(init, C::Expression)
            }
            (Self::For { init, .. }, F::Init) => List(init, C::ForInit),
            (Self::ElementValuePair { value, .. }, F::Value) => Required(value, C::ElementValue),
            (
                Self::Yield { value }
                | Self::Assignment { value, .. }
                | Self::CompoundAssignment { value, .. },
                F::Value,
            ) => Required(value, C::Expression),
            (Self::TypeParameter { bounds, .. } | Self::IntersectionType { bounds }, F::Bounds) => {
                List(bounds, C::Type)
            }
            (Self::Block { statements } | Self::Case { statements, .. }, F::Statements) => {
                List(statements, C::Statement)
            }
            (
                Self::ExpressionStmt { expression }
                | Self::Throw { expression }
                | Self::Parens { expression }
                | Self::ForEach { expression, .. }
                | Self::TypeCast { expression, .. }
                | Self::InstanceOf { expression, .. },
                F::Expression,
            ) => Required(expression, C::Expression),
            (Self::Return { expression }, F::Expression) => Optional(expression, C::Expression),
            (
                Self::If { condition, .. }
                | Self::While { condition, .. }
                | Self::DoWhile { condition, .. }
                | Self::Assert { condition, .. }
                | Self::Conditional { condition, .. },
                F::Condition,
            ) => Required(condition, C::Expression),
            (Self::For { condition, .. }, F::Condition) => Optional(condition, C::Expression),
            (Self::If { then_branch, .. }, F::ThenBranch) => Required(then_branch, C::Statement),
            (Self::If { else_branch, .. }, F::ElseBranch) => Optional(else_branch, C::Statement),
            (Self::For { update, .. }, F::Update) => List(update, C::Expression),
            (Self::Try { resources, .. }, F::Resources) => List(resources, C::Resource),
            (Self::Try { catches, .. }, F::Catches) => List(catches, C::Catch),
            (Self::Try { finally, .. }, F::Finally) => Optional(finally, C::Block),
            (Self::Catch { parameter, .. }, F::Parameter) => Required(parameter, C::Parameter),
            (Self::Switch { selector, .. }, F::Selector) => Required(selector, C::Expression),
            (Self::Switch { cases, .. }, F::Cases) => List(cases, C::Case),
            (Self::Case { labels, .. }, F::Labels) => List(labels, C::CaseLabel),
            (Self::Case { guard, .. }, F::Guard) => Optional(guard, C::Expression),
            (Self::Synchronized { lock, .. }, F::Lock) => Required(lock, C::Expression),
            (Self::Assert { detail, .. }, F::Detail) => Optional(detail, C::Expression),
            (
                Self::FieldAccess { target, .. } | Self::MemberReference { target, .. },
                F::Target,
            ) => Required(target, C::ExpressionOrType),
            (Self::MethodInvocation { target, .. }, F::Target) => {
                Optional(target, C::ExpressionOrType)
            }
            (
                Self::Assignment { target, .. } | Self::CompoundAssignment { target, .. },
                F::Target,
            ) => Required(target, C::Expression),
            (Self::InstanceOf { target, .. }, F::Target) => {
                Required(target, C::InstanceOfTarget)
            }
            (
                Self::MethodInvocation { type_arguments, .. }
                | Self::NewClass { type_arguments, .. }
                | Self::MemberReference { type_arguments, .. }
                | Self::ParameterizedType { type_arguments, .. },
                F::TypeArguments,
            ) => List(type_arguments, C::TypeArgument),
            (Self::NewClass { class_type, .. }, F::ClassType) => Required(class_type, C::Type),
            (Self::NewClass { outer, .. }, F::Outer) => Optional(outer, C::Expression),
            (Self::NewArray { dimensions, .. }, F::Dimensions) => List(dimensions, C::Expression),
            (Self::NewArray { initializer, .. }, F::Initializer) => {
                Optional(initializer, C::ArrayInit)
            }
            (Self::ArrayInit { elements }, F::Elements) => List(elements, C::ElementValue),
            (Self::Binary { left, .. }, F::Left) => Required(left, C::Expression),
            (Self::Binary { right, .. }, F::Right) => Required(right, C::Expression),
            (Self::Unary { operand, .. }, F::Operand) => Required(operand, C::Expression),
            (Self::Conditional { then_value, .. }, F::ThenValue) => {
                Required(then_value, C::Expression)
            }
            (Self::Conditional { else_value, .. }, F::ElseValue) => {
                Required(else_value, C::Expression)
            }
            (Self::TypeCast { types, .. }, F::Types) => List(types, C::Type),
            (Self::ArrayAccess { array, .. }, F::Array) => Required(array, C::Expression),
            (Self::ArrayAccess { index, .. }, F::Index) => Required(index, C::Expression),
            (Self::RecordPattern { components, .. }, F::Components) => {
                List(components, C::Pattern)
            }
            (Self::ParameterizedType { base, .. }, F::Base) => Required(base, C::Type),
            (Self::ArrayType { element, .. }, F::Element) => Required(element, C::Type),
            (Self::Wildcard { bound, .. }, F::Bound) => Optional(bound, C::Type),
            (Self::UnionType { alternatives }, F::Alternatives) => List(alternatives, C::Type),
            _ => return None,
        };
        Some(slot)
    }

    /// The node's primary name, for kinds that have one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Package { name, .. }
            | Self::Import { name, .. }
            | Self::Module { name, .. }
            | Self::ClassDecl { name, .. }
            | Self::EnumConstant { name, .. }
            | Self::MethodDecl { name, .. }
            | Self::VariableDeclarator { name, .. }
            | Self::Parameter { name, .. }
            | Self::Annotation { name, .. }
            | Self::TypeParameter { name, .. }
            | Self::ForEach { name, .. }
            | Self::Ident { name }
            | Self::FieldAccess { name, .. }
            | Self::MethodInvocation { name, .. }
            | Self::MemberReference { name, .. }
            | Self::BindingPattern { name, .. }
            | Self::TypeName { name } => Some(name),
            Self::Requires { module, .. } => Some(module),
            Self::Exports { package, .. } | Self::Opens { package, .. } => Some(package),
            Self::Uses { service } | Self::Provides { service, .. } => Some(service),
            Self::ElementValuePair { key, .. } => Some(key),
            Self::Labeled { label, .. } => Some(label),
            _ => None,
        }
    }

    pub(crate) fn name_mut(&mut self) -> Option<&mut CompactString> {
        match self {
            Self::Package { name, .. }
            | Self::Import { name, .. }
            | Self::Module { name, .. }
            | Self::ClassDecl { name, .. }
            | Self::EnumConstant { name, .. }
            | Self::MethodDecl { name, .. }
            | Self::VariableDeclarator { name, .. }
            | Self::Parameter { name, .. }
            | Self::Annotation { name, .. }
            | Self::TypeParameter { name, .. }
            | Self::ForEach { name, .. }
            | Self::Ident { name }
            | Self::FieldAccess { name, .. }
            | Self::MethodInvocation { name, .. }
            | Self::MemberReference { name, .. }
            | Self::BindingPattern { name, .. }
            | Self::TypeName { name } => Some(name),
            Self::Requires { module, .. } => Some(module),
            Self::Exports { package, .. } | Self::Opens { package, .. } => Some(package),
            Self::Uses { service } | Self::Provides { service, .. } => Some(service),
            Self::ElementValuePair { key, .. } => Some(key),
            Self::Labeled { label, .. } => Some(label),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_source_order() {
        let data = NodeData::If {
            condition: NodeId(1),
            then_branch: NodeId(2),
            else_branch: Some(NodeId(3)),
        };
        assert_eq!(
            data.children().as_slice(),
            &[NodeId(1), NodeId(2), NodeId(3)]
        );
        assert_eq!(data.kind(), NodeKind::If);
    }

    #[test]
    fn test_every_listed_field_has_a_slot() {
        let mut samples = vec![
            NodeData::CompilationUnit {
                package: None,
                imports: vec![],
                types: vec![],
                module: None,
            },
            NodeData::MethodDecl {
                modifiers: None,
                type_parameters: vec![],
                return_type: None,
                name: "m".into(),
                parameters: vec![],
                throws: vec![],
                default_value: None,
                body: None,
                compact: false,
            },
            NodeData::For {
                init: vec![],
                condition: None,
                update: vec![],
                body: NodeId(0),
            },
            NodeData::NewClass {
                outer: None,
                type_arguments: vec![],
                class_type: NodeId(0),
                arguments: vec![],
                body: None,
            },
        ];
        for data in &mut samples {
            for field in data.fields() {
                assert!(data.slot_mut(*field).is_some(), "{:?} {field}", data.kind());
            }
        }
    }

    #[test]
    fn test_missing_slot() {
        let mut data = NodeData::Ident { name: "x".into() };
        assert!(data.slot_mut(Field::Body).is_none());
        assert_eq!(data.name(), Some("x"));
        *data.name_mut().unwrap() = "y".into();
        assert_eq!(data.name(), Some("y"));
    }

    #[test]
    fn test_literal_value_kind() {
        assert_eq!(LiteralValue::Long(1).kind(), TreeKind::LongLiteral);
        assert_eq!(
            LiteralValue::String("a".into()).kind(),
            TreeKind::StringLiteral
        );
    }
}
