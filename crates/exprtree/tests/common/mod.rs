// Small expression grammar shared by the integration tests
#![allow(dead_code)]

use std::sync::Arc;

use exprtree::*;

pub const KIND_NAMES: [&str; 11] = [
    "Script",
    "Block",
    "Literal",
    "Identifier",
    "Assignment",
    "Property",
    "MethodCall",
    "Mark",
    "Halt",
    "Fail",
    "Scope",
];

/// Test node kinds. Statement-like kinds (`Script`, `Block`) rely entirely
/// on the base defaults.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Script,
    Block,
    Literal(Value),
    Identifier(String),
    /// `child0 = child1`
    Assignment,
    /// `child0.name`
    Property(String),
    /// `.name(child0, child1, ...)` applied to a receiver
    MethodCall(String),
    /// Statement that appends its label to the `log` variable
    Mark(&'static str),
    /// Statement that appends its label and yields false
    Halt(&'static str),
    /// Statement that errors
    Fail,
    /// Block whose body runs in its own context scope
    Scope,
}

fn log(ctx: &mut dyn Context, label: &str) -> Result<(), EvalError> {
    let mut entries = ctx
        .get("log")
        .and_then(|v| v.as_list().map(<[Value]>::to_vec))
        .unwrap_or_default();
    entries.push(Value::string(label));
    ctx.set("log", Value::list(entries))?;
    Ok(())
}

impl Node for Expr {
    fn kind(&self) -> Kind {
        let tag = match self {
            Expr::Script => 0,
            Expr::Block => 1,
            Expr::Literal(_) => 2,
            Expr::Identifier(_) => 3,
            Expr::Assignment => 4,
            Expr::Property(_) => 5,
            Expr::MethodCall(_) => 6,
            Expr::Mark(_) => 7,
            Expr::Halt(_) => 8,
            Expr::Fail => 9,
            Expr::Scope => 10,
        };
        Kind(tag)
    }

    fn interpret(node: NodeRef<'_, Self>, ctx: &mut dyn Context) -> Result<bool, EvalError> {
        match node.data() {
            Expr::Mark(label) => {
                log(ctx, label)?;
                Ok(true)
            }
            Expr::Halt(label) => {
                log(ctx, label)?;
                Ok(false)
            }
            Expr::Fail => Err(anyhow::anyhow!("statement failed").into()),
            Expr::Scope => {
                let mut scope = ScopeGuard::for_node(ctx, node.id());
                node.interpret_children(&mut *scope)
            }
            Expr::Assignment => {
                let value = node.child(1)?.value(ctx)?;
                node.child(0)?.set_value(ctx, value)?;
                Ok(true)
            }
            _ => node.interpret_children(ctx),
        }
    }

    fn value(node: NodeRef<'_, Self>, ctx: &mut dyn Context) -> Result<Value, EvalError> {
        match node.data() {
            Expr::Literal(v) => Ok(v.clone()),
            Expr::Identifier(name) => ctx.get(name).ok_or_else(|| {
                ContextError::UndefinedVariable { name: name.clone() }.into()
            }),
            Expr::Property(name) => {
                let target = node.child(0)?.value(ctx)?;
                node.introspector().property(&target, name)
            }
            Expr::Fail => Err(anyhow::anyhow!("value failed").into()),
            _ => Ok(Value::Null),
        }
    }

    fn set_value(
        node: NodeRef<'_, Self>,
        ctx: &mut dyn Context,
        value: Value,
    ) -> Result<Value, EvalError> {
        match node.data() {
            Expr::Identifier(name) => {
                ctx.set(name, value.clone())?;
                Ok(value)
            }
            Expr::Literal(_) => Err(EvalError::NotAssignable {
                kind: node.to_string(),
            }),
            _ => Ok(Value::Null),
        }
    }

    fn execute(
        node: NodeRef<'_, Self>,
        target: &Value,
        ctx: &mut dyn Context,
    ) -> Result<Value, EvalError> {
        match node.data() {
            Expr::MethodCall(name) => {
                let args = node
                    .children()
                    .map(|arg| arg.value(ctx))
                    .collect::<Result<Vec<_>, _>>()?;
                node.introspector().invoke(target, name, &args)
            }
            _ => Ok(Value::Null),
        }
    }
}

pub fn parser() -> Arc<Parser> {
    Parser::new(Arc::new(KindTable::new(KIND_NAMES)), BasicIntrospector::shared())
}

pub fn parser_with(config: TreeConfig) -> Arc<Parser> {
    Parser::with_config(
        Arc::new(KindTable::new(KIND_NAMES)),
        BasicIntrospector::shared(),
        config,
    )
}

/// Attach `children` to `parent` in order, linking parents as a parser would.
pub fn attach(ast: &mut Ast<Expr>, parent: NodeId, children: &[NodeId]) {
    for (index, child) in children.iter().enumerate() {
        ast.set_parent(*child, Some(parent)).expect("known node");
        ast.add_child(parent, *child, index).expect("attach");
    }
}

/// Build a `Block` of the given statements and make it the root.
pub fn block(stmts: Vec<Expr>) -> (Ast<Expr>, NodeId) {
    let mut ast = parser().tree();
    let root = ast.create(Expr::Block);
    let ids: Vec<_> = stmts.into_iter().map(|s| ast.create(s)).collect();
    attach(&mut ast, root, &ids);
    ast.set_root(root).expect("root");
    (ast, root)
}

/// The innermost `Scope` enclosing `node`, found through parent links.
pub fn enclosing_scope(node: NodeRef<'_, Expr>) -> Option<NodeId> {
    node.ancestors()
        .find(|ancestor| matches!(ancestor.data(), Expr::Scope))
        .map(|scope| scope.id())
}

/// Labels recorded by `Mark`/`Halt` statements, in order.
pub fn logged(env: &Environment) -> Vec<String> {
    env.get("log")
        .and_then(|v| v.as_list().map(|items| items.iter().map(|i| i.to_string()).collect()))
        .unwrap_or_default()
}

/// Route library logs to the test harness; set `RUST_LOG=exprtree=trace`
/// to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
