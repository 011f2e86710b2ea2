mod builtins;
mod scope;

pub use scope::{Scope, VarId};

use std::rc::Rc;

use itertools::Itertools;

use crate::ast::{File, FunctionDisplay, Ident, LiteralValue, Node, NodeKind, Operator};
use crate::errors::{SprigError, SprigErrorKind};
use crate::span::{Pos, Source};
use crate::value::{FunctionValue, StaticValue};

use builtins::BUILTINS;

/// Calls nested deeper than this yield `Unknown` instead of recursing
/// further, so self-referential functions cannot hang the analysis.
const MAX_CALL_DEPTH: usize = 100;

/// A variable as observed by the annotator.
#[derive(Clone, Debug)]
pub struct Variable {
    /// Location of the whole declaration.
    pub src: Source,
    pub is_const: bool,
    pub ident: Ident,
    pub suppress_hint: bool,
    pub value: StaticValue,
}

/// A use of a variable: the identifier occurrence and the variable it
/// resolved to.
#[derive(Clone, Debug)]
pub struct Reference {
    pub ident: Ident,
    pub var: VarId,
}

/// The value of a top-level expression statement.
#[derive(Clone, Debug)]
pub struct ShowValue {
    pub src: Source,
    pub value: StaticValue,
}

/// An editor-facing inlay hint: a label to render after `pos`.
#[derive(Clone, Debug, PartialEq)]
pub struct InlayHint {
    pub pos: Pos,
    pub label: String,
}

/// Everything the static analysis learned about one file. Variables live
/// in an arena; `variables` lists the declarations seen at the top level
/// while references may also point at function parameters.
#[derive(Clone, Debug)]
pub struct FileAnnotation {
    pub errors: Vec<SprigError>,
    arena: Vec<Variable>,
    pub variables: Vec<VarId>,
    pub references: Vec<Reference>,
    pub show_values: Vec<ShowValue>,
}

/// Annotate a parsed file. Parse errors recorded on the file are not
/// repeated here; diagnostics should combine both.
pub fn annotate(file: &File) -> FileAnnotation {
    debug!("annotate {}", file.src.filepath);
    let mut annotator = Annotator::new();
    for stmt in &file.stmts {
        annotator.eval(stmt);
    }
    annotator.drain_deferred();
    FileAnnotation {
        errors: annotator.errors,
        arena: annotator.arena,
        variables: annotator.variables,
        references: annotator.references,
        show_values: annotator.show_values,
    }
}

impl FileAnnotation {
    pub fn var(&self, id: VarId) -> &Variable {
        &self.arena[id.0]
    }

    /// Hover entries for the cursor position: declarations whose name spans
    /// the position, then references. The end of a span is exclusive here.
    pub fn hover_texts(&self, lineno: usize, col: usize) -> Vec<String> {
        let mut texts = vec![];
        for &id in &self.variables {
            let var = self.var(id);
            if var.ident.src.span.contains(lineno, col) {
                texts.push(format_variable(var));
            }
        }
        for reference in &self.references {
            if reference.ident.src.span.contains(lineno, col) {
                texts.push(format_variable(self.var(reference.var)));
            }
        }
        texts
    }

    /// The location of the declared name a reference at the cursor resolves
    /// to. Builtins have no navigable definition.
    pub fn definition_at(&self, lineno: usize, col: usize) -> Option<Source> {
        for reference in &self.references {
            if reference.ident.src.span.contains_inclusive(lineno, col) {
                let var = self.var(reference.var);
                if var.src.is_builtin() {
                    continue;
                }
                return Some(var.ident.src.clone());
            }
        }
        None
    }

    /// Value hints in file order: `: value` after a const declaration with
    /// a known non-function value, and ` = value` after each top level
    /// expression statement.
    pub fn inlay_hints(&self) -> Vec<InlayHint> {
        let mut hints = vec![];
        for &id in &self.variables {
            let var = self.var(id);
            if var.suppress_hint {
                continue;
            }
            if var.is_const
                && !matches!(var.value, StaticValue::Function(_))
                && !var.value.is_unknown()
            {
                hints.push(InlayHint {
                    pos: var.src.span.end,
                    label: format!(": {}", var.value),
                });
            }
        }
        for show in &self.show_values {
            hints.push(InlayHint {
                pos: show.src.span.end,
                label: format!(" = {}", show.value),
            });
        }
        hints
    }
}

fn format_variable(var: &Variable) -> String {
    let storage = if var.is_const { "const" } else { "var" };
    let value = if var.is_const {
        format!(" = {}", var.value.format())
    } else {
        String::new()
    };
    let builtin = if var.src.is_builtin() { " (builtin)" } else { "" };
    format!("{} {}{}{}", storage, var.ident.name, value, builtin)
}

/// A function body awaiting its shadow-run in the environment it was
/// displayed in.
struct Deferred {
    display: Rc<FunctionDisplay>,
    env: Scope,
}

struct Annotator {
    scope: Scope,
    arena: Vec<Variable>,
    errors: Vec<SprigError>,
    variables: Vec<VarId>,
    references: Vec<Reference>,
    show_values: Vec<ShowValue>,
    deferred: Vec<Deferred>,
    /// Depth of shadow-runs; only the outermost lexical level records show
    /// values.
    static_scope_depth: usize,
    /// Depth of actual calls; everything recorded is gated on being outside
    /// a call.
    callstack_depth: usize,
}

impl Annotator {
    fn new() -> Annotator {
        let mut annotator = Annotator {
            scope: Scope::root(),
            arena: vec![],
            errors: vec![],
            variables: vec![],
            references: vec![],
            show_values: vec![],
            deferred: vec![],
            static_scope_depth: 0,
            callstack_depth: 0,
        };
        for (name, f) in BUILTINS.iter() {
            let ident = Ident {
                name: str!(*name),
                src: Source::builtin(),
            };
            let value = StaticValue::Function(Rc::new(FunctionValue::Native { name, f: *f }));
            let id = annotator.alloc(Variable {
                src: Source::builtin(),
                is_const: true,
                ident,
                suppress_hint: true,
                value,
            });
            annotator.scope.define(str!(*name), id);
        }
        annotator
    }

    fn alloc(&mut self, var: Variable) -> VarId {
        let id = VarId(self.arena.len());
        self.arena.push(var);
        id
    }

    fn error(&mut self, src: &Source, kind: SprigErrorKind, msg: String) {
        // errors inside actual calls would repeat per call site
        if self.callstack_depth == 0 {
            self.errors.push(SprigError::new(msg, src.clone(), kind));
        }
    }

    fn eval(&mut self, node: &Node) -> StaticValue {
        match &node.kind {
            NodeKind::Pass(_) => StaticValue::Unknown,
            NodeKind::Block(stmts) => {
                let mut value = StaticValue::Unknown;
                for stmt in stmts {
                    value = self.eval(stmt);
                }
                value
            }
            NodeKind::Literal(value) => match value {
                LiteralValue::Null => StaticValue::Null,
                LiteralValue::Bool(b) => StaticValue::Bool(*b),
                LiteralValue::Number(n) => StaticValue::Number(*n),
                LiteralValue::Str(s) => StaticValue::str(s.clone()),
            },
            NodeKind::Name(name) => match self.scope.lookup(name) {
                Some(id) => {
                    if self.callstack_depth == 0 {
                        self.references.push(Reference {
                            ident: Ident {
                                name: name.clone(),
                                src: node.src.clone(),
                            },
                            var: id,
                        });
                    }
                    self.arena[id.0].value.clone()
                }
                None => {
                    self.error(
                        &node.src,
                        SprigErrorKind::Name,
                        format!("Variable {} not found", name),
                    );
                    StaticValue::Unknown
                }
            },
            NodeKind::Assign(assign) => {
                let id = match self.scope.lookup(&assign.target.name) {
                    Some(id) => id,
                    None => {
                        self.error(
                            &node.src,
                            SprigErrorKind::Name,
                            format!("Variable {} not found", assign.target.name),
                        );
                        return StaticValue::Unknown;
                    }
                };
                if self.arena[id.0].is_const {
                    self.error(
                        &node.src,
                        SprigErrorKind::Name,
                        format!("Variable {} is const", assign.target.name),
                    );
                    return StaticValue::Unknown;
                }
                if self.callstack_depth == 0 {
                    self.references.push(Reference {
                        ident: assign.target.clone(),
                        var: id,
                    });
                }
                let value = self.eval(&assign.value);
                self.arena[id.0].value = value.clone();
                value
            }
            NodeKind::Decl(decl) => {
                let value = self.eval(&decl.value);
                let suppress = decl.suppress_hint || self.value_is_obvious(&decl.value);
                let id = self.alloc(Variable {
                    src: node.src.clone(),
                    is_const: decl.is_const,
                    ident: decl.name.clone(),
                    suppress_hint: suppress,
                    value: if self.callstack_depth == 0 {
                        value.clone()
                    } else {
                        StaticValue::Unknown
                    },
                });
                if self.callstack_depth == 0 {
                    self.variables.push(id);
                }
                self.scope.define(decl.name.name.clone(), id);
                value
            }
            NodeKind::Show(inner) => {
                let value = self.eval(inner);
                if self.callstack_depth == 0 && self.static_scope_depth == 0 {
                    self.show_values.push(ShowValue {
                        src: node.src.clone(),
                        value: value.clone(),
                    });
                }
                value
            }
            NodeKind::FunctionDisplay(display) => {
                let env = self.scope.clone();
                self.deferred.push(Deferred {
                    display: display.clone(),
                    env: env.clone(),
                });
                StaticValue::Function(Rc::new(FunctionValue::Display {
                    display: display.clone(),
                    env,
                }))
            }
            NodeKind::Operation(operation) => {
                self.eval_operation(&node.src, operation.op, &operation.args)
            }
        }
    }

    /// A declaration whose initializer is plainly readable off the source
    /// gets no inlay hint.
    fn value_is_obvious(&self, node: &Node) -> bool {
        match &node.kind {
            NodeKind::Literal(_) => true,
            NodeKind::Name(name) => match self.scope.lookup(name) {
                Some(id) => {
                    let var = &self.arena[id.0];
                    var.is_const && !var.value.is_unknown()
                }
                None => false,
            },
            NodeKind::Operation(operation) => {
                operation.op != Operator::FunctionCall
                    && operation.args.iter().all(|arg| self.value_is_obvious(arg))
            }
            _ => false,
        }
    }

    fn eval_operation(&mut self, src: &Source, op: Operator, args: &[Node]) -> StaticValue {
        match op {
            Operator::And | Operator::Or => {
                if args.len() != 2 {
                    self.error(
                        src,
                        SprigErrorKind::Eval,
                        format!(
                            "AND and OR operators require exactly 2 arguments but got {}",
                            args.len()
                        ),
                    );
                    return StaticValue::Unknown;
                }
                let lhs = self.eval(&args[0]);
                if lhs.is_unknown() {
                    // annotate both branches and stay unknown
                    self.eval(&args[1]);
                    return StaticValue::Unknown;
                }
                let take_rhs = lhs.truthy() == (op == Operator::And);
                if take_rhs {
                    self.eval(&args[1])
                } else {
                    lhs
                }
            }
            Operator::If => {
                if args.len() != 3 {
                    self.error(
                        src,
                        SprigErrorKind::Eval,
                        format!(
                            "IF operator requires exactly 3 arguments but got {}",
                            args.len()
                        ),
                    );
                    return StaticValue::Unknown;
                }
                let condition = self.eval(&args[0]);
                if condition.is_unknown() {
                    self.eval(&args[1]);
                    self.eval(&args[2]);
                    return StaticValue::Unknown;
                }
                if condition.truthy() {
                    self.eval(&args[1])
                } else {
                    self.eval(&args[2])
                }
            }
            Operator::Coalesce => {
                if args.len() != 2 {
                    self.error(
                        src,
                        SprigErrorKind::Eval,
                        format!(
                            "'??' operator requires exactly 2 arguments but got {}",
                            args.len()
                        ),
                    );
                    return StaticValue::Unknown;
                }
                let lhs = self.eval(&args[0]);
                if lhs.is_unknown() {
                    self.eval(&args[1]);
                    return StaticValue::Unknown;
                }
                if lhs == StaticValue::Null {
                    self.eval(&args[1])
                } else {
                    lhs
                }
            }
            _ => {
                let args = args.iter().map(|arg| self.eval(arg)).collect::<Vec<_>>();
                self.eval_eager(src, op, args)
            }
        }
    }

    fn eval_eager(&mut self, src: &Source, op: Operator, args: Vec<StaticValue>) -> StaticValue {
        use StaticValue::*;
        match op {
            Operator::FunctionCall => {
                if let Some(Function(f)) = args.first() {
                    if args.iter().all(|a| !a.is_unknown()) {
                        return self.call(f.clone(), &args[1..]);
                    }
                }
                Unknown
            }
            Operator::ListDisplay => List(Rc::new(args)),
            Operator::MapDisplay => {
                let mut pairs: Vec<(StaticValue, StaticValue)> = vec![];
                for pair in args.chunks_exact(2) {
                    if pair[0].is_unknown() {
                        return Unknown;
                    }
                    // a repeated key overwrites in place
                    match pairs.iter_mut().find(|(k, _)| *k == pair[0]) {
                        Some(entry) => entry.1 = pair[1].clone(),
                        None => pairs.push((pair[0].clone(), pair[1].clone())),
                    }
                }
                Map(Rc::new(pairs))
            }
            Operator::Subscript => self.subscript(src, args),
            Operator::Add => match args.as_slice() {
                [value] => value.clone(),
                [Number(a), Number(b)] => Number(a + b),
                [Str(a), Str(b)] => StaticValue::str(format!("{}{}", a, b)),
                _ => Unknown,
            },
            Operator::Sub => match args.as_slice() {
                [Number(n)] => Number(-n),
                [Number(a), Number(b)] => Number(a - b),
                _ => Unknown,
            },
            Operator::Mul => match args.as_slice() {
                [Number(a), Number(b)] => Number(a * b),
                _ => Unknown,
            },
            Operator::Div => match args.as_slice() {
                [Number(a), Number(b)] => Number(a / b),
                _ => Unknown,
            },
            Operator::Pow => match args.as_slice() {
                [Number(a), Number(b)] => Number(a.powf(*b)),
                _ => Unknown,
            },
            Operator::Eq => match args.as_slice() {
                [a, b] => {
                    if a.is_unknown() || b.is_unknown() {
                        Unknown
                    } else {
                        Bool(a == b)
                    }
                }
                _ => Unknown,
            },
            // `!=` parses to an Operation but has no evaluation rule; every
            // use is diagnosed
            Operator::NotEq => {
                self.error(
                    src,
                    SprigErrorKind::Eval,
                    format!("Unrecognized operator {}", op),
                );
                Unknown
            }
            Operator::Lt => match args.as_slice() {
                [Number(a), Number(b)] => Bool(a < b),
                _ => Unknown,
            },
            Operator::LtEq => match args.as_slice() {
                [Number(a), Number(b)] => Bool(a <= b),
                _ => Unknown,
            },
            Operator::Gt => match args.as_slice() {
                [Number(a), Number(b)] => Bool(a > b),
                _ => Unknown,
            },
            Operator::GtEq => match args.as_slice() {
                [Number(a), Number(b)] => Bool(a >= b),
                _ => Unknown,
            },
            Operator::And | Operator::Or | Operator::If | Operator::Coalesce => {
                // handled before argument evaluation
                Unknown
            }
        }
    }

    fn subscript(&mut self, src: &Source, args: Vec<StaticValue>) -> StaticValue {
        if let [owner, index] = args.as_slice() {
            if owner.is_unknown() || index.is_unknown() {
                return StaticValue::Unknown;
            }
            match (owner, index) {
                (StaticValue::List(items), StaticValue::Number(n)) => {
                    let i = *n as usize;
                    return if n.fract() == 0.0 && *n >= 0.0 && i < items.len() {
                        items[i].clone()
                    } else {
                        self.error(
                            src,
                            SprigErrorKind::Eval,
                            format!("Invalid index (i = {}, length = {})", n, items.len()),
                        );
                        StaticValue::Unknown
                    };
                }
                (StaticValue::Map(pairs), key) => {
                    return match pairs.iter().find(|(k, _)| k == key) {
                        Some((_, value)) => value.clone(),
                        None => {
                            self.error(
                                src,
                                SprigErrorKind::Eval,
                                str!("Key not found in map"),
                            );
                            StaticValue::Unknown
                        }
                    };
                }
                _ => {}
            }
        }
        let shown = args.iter().map(|a| a.format()).join(",");
        self.error(
            src,
            SprigErrorKind::Eval,
            format!("Unrecognized arguments for SUBSCRIPT: {}", shown),
        );
        StaticValue::Unknown
    }

    fn call(&mut self, f: Rc<FunctionValue>, args: &[StaticValue]) -> StaticValue {
        match &*f {
            FunctionValue::Native { f, .. } => f(args),
            FunctionValue::Display { display, env } => {
                if self.callstack_depth >= MAX_CALL_DEPTH {
                    return StaticValue::Unknown;
                }
                let outer = std::mem::replace(&mut self.scope, env.child());
                for (i, param) in display.params.iter().enumerate() {
                    let value = args.get(i).cloned().unwrap_or(StaticValue::Unknown);
                    self.bind_param(param, value);
                }
                self.callstack_depth += 1;
                let value = self.eval(&display.body);
                self.callstack_depth -= 1;
                self.scope = outer;
                value
            }
        }
    }

    /// Run every pending function body once in the scope it was displayed
    /// in, most recent first, with parameters bound to `Unknown`. Bodies
    /// encountered during a shadow-run are queued and drained in turn.
    fn drain_deferred(&mut self) {
        while let Some(deferred) = self.deferred.pop() {
            let outer = std::mem::replace(&mut self.scope, deferred.env.child());
            for param in &deferred.display.params {
                self.bind_param(param, StaticValue::Unknown);
            }
            self.static_scope_depth += 1;
            self.eval(&deferred.display.body);
            self.static_scope_depth -= 1;
            self.scope = outer;
        }
    }

    fn bind_param(&mut self, param: &Ident, value: StaticValue) {
        let id = self.alloc(Variable {
            src: param.src.clone(),
            ident: param.clone(),
            is_const: true,
            suppress_hint: true,
            value,
        });
        self.scope.define(param.name.clone(), id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;

    fn annotate_src(src: &str) -> FileAnnotation {
        let file = parse("t.sprig", src);
        assert!(file.errors.is_empty(), "unexpected parse errors: {:?}", file.errors);
        annotate(&file)
    }

    fn shown(ann: &FileAnnotation) -> Vec<String> {
        ann.show_values.iter().map(|s| s.value.to_string()).collect()
    }

    #[test]
    fn constant_folding_across_declarations() {
        let ann = annotate_src("const a = 1\nconst b = a + 2\nb\n");
        assert!(ann.errors.is_empty());
        assert_eq!(shown(&ann), vec!["3"]);
    }

    #[test]
    fn obvious_initializers_get_no_inlay_hint() {
        // both initializers are computable from constants in view, so only
        // the show hint remains
        let ann = annotate_src("const a = 1\nconst b = a + 2\nb\n");
        let hints = ann.inlay_hints();
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].label, " = 3");

        // a function call is never obvious
        let ann = annotate_src("const n = len(\"abc\")\n");
        let hints = ann.inlay_hints();
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].label, ": 3");
    }

    #[test]
    fn suppressed_declaration_hint() {
        let ann = annotate_src("const n := len(\"abc\")\n");
        assert!(ann.inlay_hints().is_empty());
    }

    #[test]
    fn unresolved_name_is_an_error_and_unknown() {
        let ann = annotate_src("x\n");
        assert_eq!(ann.errors.len(), 1);
        assert_eq!(ann.errors[0].kind, SprigErrorKind::Name);
        assert!(ann.errors[0].msg.contains("Variable x not found"));
        assert_eq!(shown(&ann), vec!["UnknownValue"]);
    }

    #[test]
    fn assignment_to_const_is_an_error() {
        let ann = annotate_src("const x = 1\n# x = 2\nx\n");
        assert_eq!(ann.errors.len(), 1);
        assert!(ann.errors[0].msg.contains("Variable x is const"));
        // the rejected write leaves the binding untouched
        assert_eq!(shown(&ann), vec!["1"]);
    }

    #[test]
    fn assignment_updates_the_variable() {
        let ann = annotate_src("var x = 1\n# x = x + 1\nx\n");
        assert!(ann.errors.is_empty());
        assert_eq!(shown(&ann), vec!["2"]);
    }

    #[test]
    fn blocks_do_not_open_scopes() {
        // only calls and shadow-runs introduce scopes; a declaration in a
        // block rebinds the name for the rest of the enclosing scope
        let ann = annotate_src("var x = 1\n{\nvar x = 2\nx\n}\nx\n");
        assert!(ann.errors.is_empty());
        assert_eq!(shown(&ann), vec!["2", "2"]);
    }

    #[test]
    fn parameter_shadows_outer_binding_only_inside_the_call() {
        let ann = annotate_src("const x = 1\nconst f = (x) => x + 1\nf(10)\nx\n");
        assert!(ann.errors.is_empty());
        assert_eq!(shown(&ann), vec!["11", "1"]);
    }

    #[test]
    fn unknown_absorbs_through_comparison() {
        let ann = annotate_src("const u = [1, 2][9]\nu == u\n");
        // the bad subscript is reported once; the comparison stays unknown
        // rather than claiming true or false
        assert_eq!(ann.errors.len(), 1);
        assert!(ann.errors[0].msg.contains("Invalid index (i = 9, length = 2)"));
        assert_eq!(shown(&ann), vec!["UnknownValue"]);
    }

    #[test]
    fn unknown_absorbs_through_eager_operators() {
        let ann = annotate_src(
            "const u = [1, 2][9]\nu + 1\n1 - u\nu * 2\nu / 2\nu ** 2\n-u\nu < 1\nu <= 1\nu > 1\nu >= 1\n",
        );
        // one error for the bad subscript; every operation stays unknown
        assert_eq!(ann.errors.len(), 1);
        assert_eq!(shown(&ann), vec!["UnknownValue"; 10]);
    }

    #[test]
    fn equality_on_known_values() {
        let ann = annotate_src("1 == 1\n\"a\" == \"b\"\n");
        assert_eq!(shown(&ann), vec!["true", "false"]);
    }

    #[test]
    fn not_equals_is_an_unrecognized_operator() {
        let ann = annotate_src("2 != 3\n");
        assert_eq!(ann.errors.len(), 1);
        assert_eq!(ann.errors[0].kind, SprigErrorKind::Eval);
        assert!(ann.errors[0].msg.contains("Unrecognized operator !="));
        assert_eq!(shown(&ann), vec!["UnknownValue"]);
    }

    #[test]
    fn coalesce() {
        let ann = annotate_src("null ?? 5\n0 ?? 5\n");
        assert_eq!(shown(&ann), vec!["5", "0"]);
    }

    #[test]
    fn short_circuit_still_annotates_unknown_branches() {
        // the condition is unknown inside the shadow-run, so both branches
        // are analyzed and both bad names are reported
        let ann = annotate_src("const f = (c) => if c then oops1 else oops2\n");
        assert_eq!(ann.errors.len(), 2);
        assert!(ann.errors[0].msg.contains("oops1"));
        assert!(ann.errors[1].msg.contains("oops2"));
    }

    #[test]
    fn calls_fold_known_arguments() {
        let ann = annotate_src("const f = (x) => x + 1\nf(2)\n");
        assert!(ann.errors.is_empty());
        assert_eq!(shown(&ann), vec!["3"]);
    }

    #[test]
    fn function_bodies_are_checked_once() {
        let ann = annotate_src("const f = (x) => nope\nf(1)\nf(2)\n");
        // the body error comes from the shadow-run, not from each call
        assert_eq!(ann.errors.len(), 1);
        assert!(ann.errors[0].msg.contains("Variable nope not found"));
    }

    #[test]
    fn shows_inside_function_bodies_are_not_recorded() {
        let ann = annotate_src("const f = () => {\n5\n}\nf()\n");
        assert_eq!(shown(&ann), vec!["5"]);
        // only the top level `f()` shows; the body statement does not,
        // neither during the call nor during the shadow-run
    }

    #[test]
    fn closures_see_later_assignments() {
        let ann = annotate_src("var x = 1\nconst get = () => x\n# x = 2\nget()\n");
        assert!(ann.errors.is_empty());
        assert_eq!(shown(&ann), vec!["2"]);
    }

    #[test]
    fn recursion_bottoms_out_as_unknown() {
        let ann = annotate_src("const f = (n) => f(n + 1)\nf(1)\n");
        assert_eq!(shown(&ann), vec!["UnknownValue"]);
    }

    #[test]
    fn function_values_format_opaquely() {
        let ann = annotate_src("const f = () => 1\nf\n");
        assert_eq!(shown(&ann), vec!["<function>"]);
        // function-valued constants get no declaration hint
        let hints = ann.inlay_hints();
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].label, " = <function>");
    }

    #[test]
    fn map_with_unknown_key_collapses() {
        // the shadow-run builds the map with k unknown; the whole map
        // becomes unknown, so the subscript absorbs instead of reporting a
        // missing key
        let ann = annotate_src("const f = (k) => ({ k: 1 })[\"x\"]\n");
        assert!(ann.errors.is_empty());
    }

    #[test]
    fn map_display_and_subscript() {
        let ann = annotate_src("const m = { \"a\": 1, \"b\": 2 }\nm[\"a\"]\nm[\"zz\"]\n");
        assert_eq!(shown(&ann), vec!["1", "UnknownValue"]);
        assert_eq!(ann.errors.len(), 1);
        assert!(ann.errors[0].msg.contains("Key not found in map"));
    }

    #[test]
    fn builtins_resolve_and_fold() {
        let ann = annotate_src("sum(range(5))\njoin(\",\", [1, 2])\n");
        assert!(ann.errors.is_empty());
        assert_eq!(shown(&ann), vec!["10", "1,2"]);
    }

    #[test]
    fn hover_at_declaration_and_reference() {
        //            0123456
        let ann = annotate_src("const a = 1\na\n");
        assert_eq!(ann.hover_texts(0, 6), vec!["const a = 1"]);
        assert_eq!(ann.hover_texts(1, 0), vec!["const a = 1"]);
        assert!(ann.hover_texts(0, 0).is_empty());
    }

    #[test]
    fn hover_for_builtins_is_marked() {
        let ann = annotate_src("len\n");
        assert_eq!(
            ann.hover_texts(0, 0),
            vec!["const len = <function len> (builtin)"]
        );
    }

    #[test]
    fn var_hover_hides_the_value() {
        let ann = annotate_src("var a = 1\n");
        assert_eq!(ann.hover_texts(0, 4), vec!["var a"]);
    }

    #[test]
    fn definition_resolves_to_the_declared_name() {
        let ann = annotate_src("const abc = 1\nabc\n");
        let def = ann.definition_at(1, 1).unwrap();
        assert_eq!(def.span.start.lineno, 0);
        assert_eq!(def.span.start.col, 6);

        // builtins have nowhere to navigate to
        let ann = annotate_src("len\n");
        assert!(ann.definition_at(0, 0).is_none());
    }

    #[test]
    fn references_cover_parameters() {
        let ann = annotate_src("const f = (x) => x\n");
        // hovering the `x` in the body resolves to the parameter
        assert_eq!(
            ann.hover_texts(0, 17),
            vec!["const x = (UnknownValue)"]
        );
    }

    #[test]
    fn annotation_is_deterministic() {
        let src = "const a = 1\nvar b = a + 1\n# b = b * 2\nb\nconst f = (x) => x + b\nf(1)\n";
        let first = annotate_src(src);
        let second = annotate_src(src);
        assert_eq!(shown(&first), shown(&second));
        assert_eq!(
            first.errors.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
            second.errors.iter().map(|e| e.to_string()).collect::<Vec<_>>()
        );
        assert_eq!(first.inlay_hints(), second.inlay_hints());
    }
}
