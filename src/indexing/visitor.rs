//! Context-propagating visitor over a parsed C++ translation unit.
//!
//! The visitor walks declarations, statements, and expressions in one pass
//! and emits a classified reference row for every name occurrence. The
//! usage context is an explicit [`ExprContext`] value passed down the
//! recursion, so descending into an unrelated sub-tree (a lambda body, a
//! nested type) can never leak an outer expression's context into it.
//!
//! Dispatch is a closed match over node kinds. Unrecognized kinds fall
//! through to a generic walk that records bare identifiers with the `Use`
//! fallback, so new grammar node kinds degrade safely instead of silently
//! dropping a case.

use crate::indexing::ExprContext;
use crate::indexing::builder::IndexBuilder;
use crate::types::{FileId, RefKind, Span, SymbolKind};
use tree_sitter::{Node, Tree};

pub struct AstIndexer<'a> {
    builder: &'a mut IndexBuilder,
    code: &'a str,
    file: FileId,
}

impl<'a> AstIndexer<'a> {
    pub fn new(builder: &'a mut IndexBuilder, code: &'a str, file: FileId) -> Self {
        Self {
            builder,
            code,
            file,
        }
    }

    /// Index every declaration in the tree. A malformed construct skips
    /// its own sub-tree only; the pass always runs to completion.
    pub fn index_tree(&mut self, tree: &Tree) {
        self.visit_item(tree.root_node(), false);
    }

    // Declarations and statements.

    fn visit_item(&mut self, node: Node, in_class: bool) {
        if node.is_error() || node.is_missing() || node.kind() == "comment" {
            return;
        }
        match node.kind() {
            "function_definition" => self.visit_function(node, in_class),
            "declaration" => self.visit_declaration(node),
            "field_declaration" => self.visit_field_declaration(node),
            "class_specifier" | "struct_specifier" | "union_specifier" => {
                self.visit_class(node);
            }
            "enum_specifier" => self.visit_enum(node),
            "namespace_definition" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.record_namespace_name(name);
                }
                if let Some(body) = node.child_by_field_name("body") {
                    self.visit_children(body, false);
                }
            }
            "namespace_alias_definition" => self.visit_namespace_alias(node),
            "alias_declaration" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.record_definition(name, SymbolKind::TypeAlias);
                }
                if let Some(ty) = node.child_by_field_name("type") {
                    self.visit_type(ty);
                }
            }
            "type_definition" => {
                let ty = node.child_by_field_name("type");
                if let Some(ty) = ty {
                    self.visit_decl_type(ty);
                }
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    if Some(child) == ty {
                        continue;
                    }
                    if child.kind() == "type_identifier" {
                        self.record_definition(child, SymbolKind::TypeAlias);
                    } else if is_declarator(child.kind()) {
                        if let Some(name) = declarator_name(child) {
                            self.record_definition(name, SymbolKind::TypeAlias);
                        }
                    }
                }
            }
            "using_declaration" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    self.record_name_as_use(child);
                }
            }
            "template_declaration" => self.visit_template(node, in_class),
            "preproc_def" | "preproc_function_def" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.record_definition(name, SymbolKind::Macro);
                }
            }
            "expression_statement" => {
                // A discarded full expression carries no context flags.
                if let Some(expr) = node.named_child(0) {
                    self.visit_expr(expr, ExprContext::empty());
                }
            }
            "return_statement" => {
                if let Some(expr) = node.named_child(0) {
                    self.visit_expr(expr, ExprContext::READ);
                }
            }
            "if_statement" | "while_statement" | "switch_statement" => {
                if let Some(cond) = node.child_by_field_name("condition") {
                    self.visit_condition(cond);
                }
                if let Some(body) = node.child_by_field_name("consequence") {
                    self.visit_item(body, in_class);
                }
                if let Some(alt) = node.child_by_field_name("alternative") {
                    self.visit_item(alt, in_class);
                }
                if let Some(body) = node.child_by_field_name("body") {
                    self.visit_item(body, in_class);
                }
            }
            "do_statement" => {
                if let Some(body) = node.child_by_field_name("body") {
                    self.visit_item(body, in_class);
                }
                if let Some(cond) = node.child_by_field_name("condition") {
                    self.visit_condition(cond);
                }
            }
            "for_statement" => {
                if let Some(init) = node.child_by_field_name("initializer") {
                    if init.kind() == "declaration" {
                        self.visit_item(init, false);
                    } else {
                        self.visit_expr(init, ExprContext::empty());
                    }
                }
                if let Some(cond) = node.child_by_field_name("condition") {
                    self.visit_expr(cond, ExprContext::READ);
                }
                if let Some(update) = node.child_by_field_name("update") {
                    self.visit_expr(update, ExprContext::empty());
                }
                if let Some(body) = node.child_by_field_name("body") {
                    self.visit_item(body, in_class);
                }
            }
            "for_range_loop" => {
                if let Some(ty) = node.child_by_field_name("type") {
                    self.visit_type(ty);
                }
                if let Some(decl) = node.child_by_field_name("declarator") {
                    if let Some(name) = declarator_name(decl) {
                        self.record_definition(name, SymbolKind::Variable);
                    }
                }
                if let Some(right) = node.child_by_field_name("right") {
                    self.visit_expr(right, ExprContext::READ);
                }
                if let Some(body) = node.child_by_field_name("body") {
                    self.visit_item(body, in_class);
                }
            }
            "case_statement" => {
                if let Some(value) = node.child_by_field_name("value") {
                    self.visit_expr(value, ExprContext::READ);
                }
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    if Some(child) != node.child_by_field_name("value") {
                        self.visit_item(child, in_class);
                    }
                }
            }
            "throw_statement" => {
                if let Some(expr) = node.named_child(0) {
                    self.visit_expr(expr, ExprContext::READ);
                }
            }
            "catch_clause" => {
                if let Some(params) = node.child_by_field_name("parameters") {
                    self.visit_parameters(params);
                }
                if let Some(body) = node.child_by_field_name("body") {
                    self.visit_item(body, in_class);
                }
            }
            "static_assert_declaration" => {
                if let Some(cond) = node.child_by_field_name("condition") {
                    self.visit_expr(cond, ExprContext::READ);
                }
            }
            "labeled_statement" => {
                let count = node.named_child_count();
                if count > 0 {
                    if let Some(body) = node.named_child(count - 1) {
                        self.visit_item(body, in_class);
                    }
                }
            }
            // Bare identifiers reached through an unhandled construct are
            // still worth a row: classify them with the Use fallback.
            "identifier" | "field_identifier" | "type_identifier" => {
                self.record_ref(node, RefKind::Use);
            }
            "field_declaration_list" => self.visit_children(node, true),
            _ => self.visit_children(node, in_class),
        }
    }

    fn visit_children(&mut self, node: Node, in_class: bool) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.visit_item(child, in_class);
        }
    }

    /// Function definitions and out-of-line member definitions.
    fn visit_function(&mut self, node: Node, in_class: bool) {
        if let Some(ty) = node.child_by_field_name("type") {
            self.visit_type(ty);
        }
        let mut func_decl = node.child_by_field_name("declarator");
        while let Some(decl) = func_decl {
            if decl.kind() == "function_declarator" {
                break;
            }
            func_decl = decl.child_by_field_name("declarator").or_else(|| {
                let mut cursor = decl.walk();
                decl.named_children(&mut cursor)
                    .find(|c| is_declarator(c.kind()) || c.kind() == "function_declarator")
            });
        }
        if let Some(decl) = func_decl.filter(|d| d.kind() == "function_declarator") {
            self.record_function_name(decl, in_class);
            if let Some(params) = decl.child_by_field_name("parameters") {
                self.visit_parameters(params);
            }
        }
        // Constructor member initializers: the member is written, the
        // arguments are read.
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "field_initializer_list" {
                self.visit_field_initializers(child);
            }
        }
        if let Some(body) = node.child_by_field_name("body") {
            self.visit_item(body, false);
        }
    }

    fn record_function_name(&mut self, func_decl: Node, in_class: bool) {
        let Some(name) = func_decl.child_by_field_name("declarator") else {
            return;
        };
        match name.kind() {
            "identifier" | "operator_name" | "destructor_name" => {
                let kind = if in_class {
                    SymbolKind::Method
                } else {
                    SymbolKind::Function
                };
                self.record_definition(name, kind);
            }
            "field_identifier" => {
                self.record_definition(name, SymbolKind::Method);
            }
            "qualified_identifier" => {
                // Out-of-line member: Foo::bar. Qualifier components are
                // plain uses; only the innermost name is the definition.
                let mut inner = name;
                while inner.kind() == "qualified_identifier" {
                    if let Some(scope) = inner.child_by_field_name("scope") {
                        self.record_scope_component(scope);
                    }
                    match inner.child_by_field_name("name") {
                        Some(next) => inner = next,
                        None => return,
                    }
                }
                if inner.kind() == "template_function" {
                    if let Some(tname) = inner.child_by_field_name("name") {
                        self.record_definition(tname, SymbolKind::Method);
                    }
                    self.visit_template_arguments(inner);
                } else {
                    self.record_definition(inner, SymbolKind::Method);
                }
            }
            "template_function" => {
                if let Some(tname) = name.child_by_field_name("name") {
                    let kind = if in_class {
                        SymbolKind::Method
                    } else {
                        SymbolKind::Function
                    };
                    self.record_definition(tname, kind);
                }
                self.visit_template_arguments(name);
            }
            _ => {}
        }
    }

    fn visit_field_initializers(&mut self, list: Node) {
        let mut cursor = list.walk();
        for init in list.named_children(&mut cursor) {
            if init.kind() != "field_initializer" {
                continue;
            }
            let mut inner = init.walk();
            for child in init.named_children(&mut inner) {
                match child.kind() {
                    "field_identifier" => self.record_ref(child, RefKind::Write),
                    "argument_list" | "initializer_list" => {
                        let mut args = child.walk();
                        for arg in child.named_children(&mut args) {
                            self.visit_expr(arg, ExprContext::READ);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    /// Type position of a declaration. A specifier that carries a body
    /// (`struct S { ... } s;`) defines the type inline and is walked as a
    /// declaration; anything else is a type mention.
    fn visit_decl_type(&mut self, ty: Node) {
        match ty.kind() {
            "class_specifier" | "struct_specifier" | "union_specifier" | "enum_specifier"
                if ty.child_by_field_name("body").is_some() =>
            {
                self.visit_item(ty, false);
            }
            _ => self.visit_type(ty),
        }
    }

    fn visit_declaration(&mut self, node: Node) {
        if let Some(ty) = node.child_by_field_name("type") {
            self.visit_decl_type(ty);
        }
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "init_declarator" => {
                    if let Some(decl) = child.child_by_field_name("declarator") {
                        self.visit_variable_declarator(decl);
                    }
                    if let Some(value) = child.child_by_field_name("value") {
                        self.visit_initializer(value);
                    }
                }
                kind if is_declarator(kind) => self.visit_variable_declarator(child),
                _ => {}
            }
        }
    }

    /// A declarator introducing a variable or a function prototype.
    fn visit_variable_declarator(&mut self, decl: Node) {
        match decl.kind() {
            "identifier" => self.record_definition(decl, SymbolKind::Variable),
            "function_declarator" => {
                self.record_function_name(decl, false);
                if let Some(params) = decl.child_by_field_name("parameters") {
                    self.visit_parameters(params);
                }
            }
            "array_declarator" => {
                if let Some(inner) = decl.child_by_field_name("declarator") {
                    self.visit_variable_declarator(inner);
                }
                if let Some(size) = decl.child_by_field_name("size") {
                    self.visit_expr(size, ExprContext::READ);
                }
            }
            "pointer_declarator" | "reference_declarator" | "parenthesized_declarator" => {
                if let Some(name) = declarator_name(decl) {
                    self.record_definition(name, SymbolKind::Variable);
                }
            }
            _ => {}
        }
    }

    fn visit_field_declaration(&mut self, node: Node) {
        if let Some(ty) = node.child_by_field_name("type") {
            self.visit_decl_type(ty);
        }
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "field_identifier" => self.record_definition(child, SymbolKind::Field),
                "function_declarator" => {
                    self.record_function_name(child, true);
                    if let Some(params) = child.child_by_field_name("parameters") {
                        self.visit_parameters(params);
                    }
                }
                "pointer_declarator" | "reference_declarator" | "array_declarator" => {
                    if let Some(name) = declarator_name(child) {
                        if name.kind() == "function_declarator" {
                            self.record_function_name(name, true);
                        } else {
                            self.record_definition(name, SymbolKind::Field);
                        }
                    }
                }
                _ => {}
            }
        }
        if let Some(default) = node.child_by_field_name("default_value") {
            self.visit_initializer(default);
        }
    }

    fn visit_class(&mut self, node: Node) {
        let kind = if node.kind() == "struct_specifier" {
            SymbolKind::Struct
        } else {
            SymbolKind::Class
        };
        let body = node.child_by_field_name("body");
        if let Some(name) = node.child_by_field_name("name") {
            match name.kind() {
                // Explicit specialization: the pattern name defines, the
                // arguments are ordinary type references.
                "template_type" => {
                    if let Some(tname) = name.child_by_field_name("name") {
                        if body.is_some() {
                            self.record_definition(tname, kind);
                        } else {
                            self.record_ref(tname, RefKind::Use);
                        }
                    }
                    self.visit_template_arguments(name);
                }
                _ if body.is_some() => self.record_definition(name, kind),
                // Forward declaration or elaborated type use.
                _ => self.record_ref(name, RefKind::Use),
            }
        }
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "base_class_clause" {
                let mut bases = child.walk();
                for base in child.named_children(&mut bases) {
                    self.visit_type(base);
                }
            }
        }
        if let Some(body) = body {
            self.visit_children(body, true);
        }
    }

    fn visit_enum(&mut self, node: Node) {
        let body = node.child_by_field_name("body");
        if let Some(name) = node.child_by_field_name("name") {
            if body.is_some() {
                self.record_definition(name, SymbolKind::Enum);
            } else {
                self.record_ref(name, RefKind::Use);
            }
        }
        if let Some(body) = body {
            let mut cursor = body.walk();
            for child in body.named_children(&mut cursor) {
                if child.kind() == "enumerator" {
                    if let Some(name) = child.child_by_field_name("name") {
                        self.record_definition(name, SymbolKind::Constant);
                    }
                    if let Some(value) = child.child_by_field_name("value") {
                        self.visit_expr(value, ExprContext::READ);
                    }
                }
            }
        }
    }

    fn visit_namespace_alias(&mut self, node: Node) {
        if let Some(name) = node.child_by_field_name("name") {
            self.record_definition(name, SymbolKind::Namespace);
        }
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if Some(child) != node.child_by_field_name("name") {
                self.record_name_as_use(child);
            }
        }
    }

    fn visit_template(&mut self, node: Node, in_class: bool) {
        if let Some(params) = node.child_by_field_name("parameters") {
            let mut cursor = params.walk();
            for param in params.named_children(&mut cursor) {
                match param.kind() {
                    "type_parameter_declaration" | "template_template_parameter_declaration" => {
                        let mut inner = param.walk();
                        for child in param.named_children(&mut inner) {
                            if child.kind() == "type_identifier" {
                                self.record_definition(child, SymbolKind::TypeAlias);
                            }
                        }
                    }
                    "optional_type_parameter_declaration" => {
                        if let Some(name) = param.child_by_field_name("name") {
                            self.record_definition(name, SymbolKind::TypeAlias);
                        }
                        if let Some(default) = param.child_by_field_name("default_type") {
                            self.visit_type(default);
                        }
                    }
                    "parameter_declaration" | "optional_parameter_declaration" => {
                        self.visit_parameter(param);
                    }
                    _ => {}
                }
            }
        }
        // Only the primary pattern is walked; instantiation sites index
        // their template arguments as ordinary references instead of
        // re-walking the body.
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if Some(child) != node.child_by_field_name("parameters") {
                self.visit_item(child, in_class);
            }
        }
    }

    fn visit_parameters(&mut self, params: Node) {
        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            if matches!(
                param.kind(),
                "parameter_declaration" | "optional_parameter_declaration"
            ) {
                self.visit_parameter(param);
            }
        }
    }

    fn visit_parameter(&mut self, param: Node) {
        if let Some(ty) = param.child_by_field_name("type") {
            self.visit_type(ty);
        }
        if let Some(decl) = param.child_by_field_name("declarator") {
            if let Some(name) = declarator_name(decl) {
                if name.kind() == "identifier" {
                    self.record_definition(name, SymbolKind::Parameter);
                }
            }
        }
        if let Some(default) = param.child_by_field_name("default_value") {
            self.visit_expr(default, ExprContext::READ);
        }
    }

    /// Declaration initializers are reads of the initializing expression;
    /// braced lists read each element.
    fn visit_initializer(&mut self, value: Node) {
        match value.kind() {
            "initializer_list" | "argument_list" => {
                let mut cursor = value.walk();
                for child in value.named_children(&mut cursor) {
                    self.visit_initializer(child);
                }
            }
            _ => self.visit_expr(value, ExprContext::READ),
        }
    }

    fn visit_condition(&mut self, cond: Node) {
        match cond.kind() {
            "condition_clause" => {
                if let Some(value) = cond.child_by_field_name("value") {
                    self.visit_condition(value);
                }
            }
            "declaration" => self.visit_item(cond, false),
            _ => self.visit_expr(cond, ExprContext::READ),
        }
    }

    // Expressions.

    fn visit_expr(&mut self, node: Node, ctx: ExprContext) {
        if node.is_error() || node.is_missing() || node.kind() == "comment" {
            return;
        }
        match node.kind() {
            "identifier" | "field_identifier" => {
                self.record_ref(node, ctx.ref_kind());
            }
            "qualified_identifier" => {
                // A scope qualifier is never called, assigned, or
                // address-taken; only the innermost name inherits the
                // ambient context.
                if let Some(scope) = node.child_by_field_name("scope") {
                    self.record_scope_component(scope);
                }
                if let Some(name) = node.child_by_field_name("name") {
                    self.visit_expr(name, ctx);
                }
            }
            "template_function" | "template_method" | "template_type" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.visit_expr(name, ctx);
                }
                self.visit_template_arguments(node);
            }
            "type_identifier" => self.record_ref(node, RefKind::Use),
            "call_expression" => {
                if let Some(function) = node.child_by_field_name("function") {
                    self.visit_expr(function, ExprContext::CALLED);
                }
                if let Some(args) = node.child_by_field_name("arguments") {
                    let mut cursor = args.walk();
                    for arg in args.named_children(&mut cursor) {
                        self.visit_expr(arg, ExprContext::READ);
                    }
                }
            }
            "assignment_expression" => {
                let lhs_ctx = match node.child_by_field_name("operator").map(|op| op.kind()) {
                    Some("=") => ExprContext::ASSIGNED,
                    _ => ExprContext::MODIFIED,
                };
                if let Some(left) = node.child_by_field_name("left") {
                    self.visit_expr(left, lhs_ctx);
                }
                if let Some(right) = node.child_by_field_name("right") {
                    self.visit_expr(right, ExprContext::READ);
                }
            }
            "update_expression" => {
                if let Some(arg) = node.child_by_field_name("argument") {
                    self.visit_expr(arg, ExprContext::MODIFIED);
                }
            }
            "pointer_expression" => {
                let is_address_of = node
                    .child_by_field_name("operator")
                    .map(|op| op.kind() == "&")
                    .unwrap_or(false);
                if let Some(arg) = node.child_by_field_name("argument") {
                    if is_address_of {
                        // Replaces whatever ambient context applied to the
                        // whole &x expression.
                        self.visit_expr(arg, ExprContext::ADDRESS_TAKEN);
                    } else {
                        self.visit_expr(arg, ExprContext::READ);
                    }
                }
            }
            "comma_expression" => {
                if let Some(left) = node.child_by_field_name("left") {
                    self.visit_expr(left, ExprContext::empty());
                }
                if let Some(right) = node.child_by_field_name("right") {
                    self.visit_expr(right, ctx);
                }
            }
            "parenthesized_expression" => {
                if let Some(inner) = node.named_child(0) {
                    self.visit_expr(inner, ctx);
                }
            }
            "cast_expression" => {
                if let Some(ty) = node.child_by_field_name("type") {
                    self.visit_type(ty);
                }
                if let Some(value) = node.child_by_field_name("value") {
                    self.visit_expr(value, ctx);
                }
            }
            "field_expression" => {
                if let Some(arg) = node.child_by_field_name("argument") {
                    self.visit_expr(arg, ExprContext::READ);
                }
                if let Some(field) = node.child_by_field_name("field") {
                    self.visit_expr(field, ctx);
                }
            }
            "subscript_expression" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    self.visit_expr(child, ExprContext::READ);
                }
            }
            "binary_expression" => {
                if let Some(left) = node.child_by_field_name("left") {
                    self.visit_expr(left, ExprContext::READ);
                }
                if let Some(right) = node.child_by_field_name("right") {
                    self.visit_expr(right, ExprContext::READ);
                }
            }
            "unary_expression" => {
                if let Some(arg) = node.child_by_field_name("argument") {
                    self.visit_expr(arg, ExprContext::READ);
                }
            }
            "conditional_expression" => {
                if let Some(cond) = node.child_by_field_name("condition") {
                    self.visit_expr(cond, ExprContext::READ);
                }
                if let Some(cons) = node.child_by_field_name("consequence") {
                    self.visit_expr(cons, ctx);
                }
                if let Some(alt) = node.child_by_field_name("alternative") {
                    self.visit_expr(alt, ctx);
                }
            }
            "sizeof_expression" => {
                // The operand is unevaluated; no distinguishing context.
                if let Some(value) = node.child_by_field_name("value") {
                    self.visit_expr(value, ExprContext::empty());
                }
                if let Some(ty) = node.child_by_field_name("type") {
                    self.visit_type(ty);
                }
            }
            "new_expression" => {
                if let Some(ty) = node.child_by_field_name("type") {
                    self.visit_type(ty);
                }
                if let Some(args) = node.child_by_field_name("arguments") {
                    let mut cursor = args.walk();
                    for arg in args.named_children(&mut cursor) {
                        self.visit_expr(arg, ExprContext::READ);
                    }
                }
            }
            "delete_expression" => {
                if let Some(expr) = node.named_child(0) {
                    self.visit_expr(expr, ExprContext::READ);
                }
            }
            "initializer_list" | "argument_list" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    self.visit_expr(child, ExprContext::READ);
                }
            }
            "lambda_expression" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    match child.kind() {
                        "lambda_capture_specifier" => {
                            let mut caps = child.walk();
                            for cap in child.named_children(&mut caps) {
                                self.visit_expr(cap, ExprContext::READ);
                            }
                        }
                        "abstract_function_declarator" | "function_declarator" => {
                            if let Some(params) = child.child_by_field_name("parameters") {
                                self.visit_parameters(params);
                            }
                        }
                        "compound_statement" => self.visit_item(child, false),
                        _ => {}
                    }
                }
            }
            "condition_clause" => self.visit_condition(node),
            // Literals and the like: no row.
            "number_literal" | "string_literal" | "char_literal" | "concatenated_string"
            | "true" | "false" | "null" | "nullptr" | "this" | "raw_string_literal" => {}
            _ => {
                // Unknown expression kind: discarded-value walk so nested
                // names still get the Use fallback.
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    self.visit_expr(child, ExprContext::empty());
                }
            }
        }
    }

    // Types.

    fn visit_type(&mut self, node: Node) {
        if node.is_error() || node.is_missing() || node.kind() == "comment" {
            return;
        }
        match node.kind() {
            "type_identifier" => self.record_ref(node, RefKind::Use),
            "primitive_type" | "sized_type_specifier" | "auto" | "placeholder_type_specifier" => {}
            "qualified_identifier" => {
                if let Some(scope) = node.child_by_field_name("scope") {
                    self.record_scope_component(scope);
                }
                if let Some(name) = node.child_by_field_name("name") {
                    self.visit_type(name);
                }
            }
            "template_type" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.visit_type(name);
                }
                self.visit_template_arguments(node);
            }
            "type_descriptor" => {
                if let Some(ty) = node.child_by_field_name("type") {
                    self.visit_type(ty);
                }
            }
            "class_specifier" | "struct_specifier" | "union_specifier" | "enum_specifier" => {
                // Elaborated type specifier in type position.
                if let Some(name) = node.child_by_field_name("name") {
                    self.visit_type(name);
                }
            }
            "decltype" => {
                if let Some(expr) = node.named_child(0) {
                    self.visit_expr(expr, ExprContext::READ);
                }
            }
            _ => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    self.visit_type(child);
                }
            }
        }
    }

    fn visit_template_arguments(&mut self, node: Node) {
        if let Some(args) = node.child_by_field_name("arguments") {
            let mut cursor = args.walk();
            for arg in args.named_children(&mut cursor) {
                if arg.kind() == "type_descriptor" {
                    self.visit_type(arg);
                } else {
                    self.visit_expr(arg, ExprContext::READ);
                }
            }
        }
    }

    /// One component of a scope qualifier: always a generic use.
    fn record_scope_component(&mut self, scope: Node) {
        match scope.kind() {
            "namespace_identifier" | "type_identifier" | "identifier" => {
                self.record_ref(scope, RefKind::Use);
            }
            "template_type" => {
                if let Some(name) = scope.child_by_field_name("name") {
                    self.record_ref(name, RefKind::Use);
                }
                self.visit_template_arguments(scope);
            }
            "decltype" => {
                if let Some(expr) = scope.named_child(0) {
                    self.visit_expr(expr, ExprContext::READ);
                }
            }
            _ => {}
        }
    }

    /// Record a possibly qualified name where every component, including
    /// the innermost, is a plain use (using-declarations, alias targets).
    fn record_name_as_use(&mut self, node: Node) {
        match node.kind() {
            "identifier" | "field_identifier" | "type_identifier" | "namespace_identifier" => {
                self.record_ref(node, RefKind::Use);
            }
            "qualified_identifier" => {
                if let Some(scope) = node.child_by_field_name("scope") {
                    self.record_scope_component(scope);
                }
                if let Some(name) = node.child_by_field_name("name") {
                    self.record_name_as_use(name);
                }
            }
            "nested_namespace_specifier" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    self.record_name_as_use(child);
                }
            }
            _ => {}
        }
    }

    /// Namespace definitions, including C++17 nested specifiers. Each
    /// component defines a namespace, so the symbol kind reconciles too.
    fn record_namespace_name(&mut self, name: Node) {
        match name.kind() {
            "namespace_identifier" | "identifier" => {
                self.record_definition(name, SymbolKind::Namespace);
            }
            "nested_namespace_specifier" => {
                let mut cursor = name.walk();
                for child in name.named_children(&mut cursor) {
                    self.record_namespace_name(child);
                }
            }
            _ => {}
        }
    }

    // Reference recording.

    fn record_definition(&mut self, name: Node, kind: SymbolKind) {
        let Some((text, span)) = self.name_and_span(name) else {
            return;
        };
        self.builder.record_definition(&text, kind, self.file, span);
    }

    fn record_ref(&mut self, name: Node, kind: RefKind) {
        let Some((text, span)) = self.name_and_span(name) else {
            return;
        };
        self.builder.record_ref(&text, kind, self.file, span);
    }

    /// Extract the name text and span of a name node. Nodes with an
    /// unusable location (zero width, spanning lines, synthesized) are
    /// skipped rather than recorded with garbage coordinates.
    fn name_and_span(&self, node: Node) -> Option<(String, Span)> {
        if node.is_missing() || node.is_error() {
            return None;
        }
        let start = node.start_position();
        let end = node.end_position();
        if node.start_byte() >= node.end_byte() || start.row != end.row {
            return None;
        }
        let text = self.code.get(node.byte_range())?;
        if text.is_empty() {
            return None;
        }
        let span = Span::new(
            start.row as u32 + 1,
            start.column as u32 + 1,
            end.column as u32 + 1,
        );
        Some((text.to_string(), span))
    }
}

/// Node kinds that wrap the declared name inside a declaration.
fn is_declarator(kind: &str) -> bool {
    matches!(
        kind,
        "identifier"
            | "pointer_declarator"
            | "reference_declarator"
            | "array_declarator"
            | "parenthesized_declarator"
            | "function_declarator"
    )
}

/// Innermost name node of a declarator chain, if any.
fn declarator_name(decl: Node) -> Option<Node> {
    match decl.kind() {
        "identifier" | "field_identifier" | "type_identifier" | "qualified_identifier"
        | "operator_name" | "destructor_name" => Some(decl),
        "pointer_declarator"
        | "reference_declarator"
        | "array_declarator"
        | "parenthesized_declarator"
        | "init_declarator"
        | "function_declarator" => {
            if let Some(inner) = decl.child_by_field_name("declarator") {
                return declarator_name(inner);
            }
            let mut cursor = decl.walk();
            let children: Vec<Node> = decl.named_children(&mut cursor).collect();
            children.into_iter().find_map(declarator_name)
        }
        _ => None,
    }
}
