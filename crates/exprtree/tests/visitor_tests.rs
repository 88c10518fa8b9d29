// Visitor double dispatch and child traversal
mod common;

use common::*;
use exprtree::*;
use pretty_assertions::assert_eq;

/// Records every node it is shown and returns a per-kind answer.
#[derive(Default)]
struct Recorder {
    seen: Vec<NodeId>,
}

impl Visitor<Expr> for Recorder {
    type Data = u32;
    type Output = String;

    fn visit(&mut self, node: NodeRef<'_, Expr>, data: u32) -> Result<String, EvalError> {
        self.seen.push(node.id());
        let answer = match node.data() {
            Expr::Identifier(name) => format!("ident:{}:{}", name, data),
            Expr::Literal(v) => format!("lit:{:?}:{}", v, data),
            _ => format!("{}:{}", node, data),
        };
        Ok(answer)
    }
}

/// Walks the whole tree recording pre-order ids.
#[derive(Default)]
struct Walker {
    order: Vec<NodeId>,
}

impl Visitor<Expr> for Walker {
    type Data = Vec<&'static str>;
    type Output = Vec<&'static str>;

    fn visit(
        &mut self,
        node: NodeRef<'_, Expr>,
        data: Self::Data,
    ) -> Result<Self::Data, EvalError> {
        self.order.push(node.id());
        node.accept_children(self, data)
    }
}

/// Fails on `Fail` nodes.
struct Strict {
    seen: usize,
}

impl Visitor<Expr> for Strict {
    type Data = ();
    type Output = ();

    fn visit(&mut self, node: NodeRef<'_, Expr>, _data: ()) -> Result<(), EvalError> {
        self.seen += 1;
        match node.data() {
            Expr::Fail => Err(EvalError::TypeError {
                expected: "statement".into(),
                got: node.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

#[test]
fn test_accept_returns_visitor_result_unmodified() {
    let (ast, root) = block(vec![
        Expr::Identifier("x".into()),
        Expr::Literal(Value::Int(2)),
    ]);
    let node = ast.node(root).unwrap();
    let mut rec = Recorder::default();

    assert_eq!(node.accept(&mut rec, 7).unwrap(), "Block:7");
    assert_eq!(node.child(0).unwrap().accept(&mut rec, 1).unwrap(), "ident:x:1");
    assert_eq!(node.child(1).unwrap().accept(&mut rec, 0).unwrap(), "lit:2:0");
    assert_eq!(rec.seen.len(), 3);
}

#[test]
fn test_accept_children_order_and_returns_original_data() {
    let (ast, root) = block(vec![Expr::Mark("c1"), Expr::Mark("c2")]);
    let node = ast.node(root).unwrap();
    let mut rec = Recorder::default();

    let data = node.accept_children(&mut rec, 42).unwrap();
    assert_eq!(data, 42);
    assert_eq!(
        rec.seen,
        vec![node.child(0).unwrap().id(), node.child(1).unwrap().id()]
    );
}

#[test]
fn test_accept_children_passes_same_data_to_each_child() {
    #[derive(Default)]
    struct Seen(Vec<Vec<&'static str>>);

    impl Visitor<Expr> for Seen {
        type Data = Vec<&'static str>;
        type Output = Vec<&'static str>;

        fn visit(
            &mut self,
            node: NodeRef<'_, Expr>,
            mut data: Self::Data,
        ) -> Result<Self::Data, EvalError> {
            self.0.push(data.clone());
            if let Expr::Mark(label) = node.data() {
                data.push(*label);
            }
            Ok(data)
        }
    }

    let (ast, root) = block(vec![Expr::Mark("a"), Expr::Mark("b")]);
    let mut seen = Seen::default();
    let data = ast
        .node(root)
        .unwrap()
        .accept_children(&mut seen, vec!["start"])
        .unwrap();

    assert_eq!(data, vec!["start"]);
    assert_eq!(seen.0, vec![vec!["start"], vec!["start"]]);
}

#[test]
fn test_accept_children_skips_empty_slots() {
    let mut ast = parser_with(TreeConfig::new().allow_sparse()).tree();
    let root = ast.create(Expr::Block);
    let a = ast.create(Expr::Mark("a"));
    let b = ast.create(Expr::Mark("b"));
    ast.add_child(root, a, 1).unwrap();
    ast.add_child(root, b, 4).unwrap();

    let mut rec = Recorder::default();
    ast.node(root).unwrap().accept_children(&mut rec, 0).unwrap();
    assert_eq!(rec.seen, vec![a, b]);
}

#[test]
fn test_accept_children_on_leaf_returns_data() {
    let (ast, root) = block(vec![Expr::Mark("leaf")]);
    let leaf = ast.node(root).unwrap().child(0).unwrap();
    let mut rec = Recorder::default();
    assert_eq!(leaf.accept_children(&mut rec, 9).unwrap(), 9);
    assert!(rec.seen.is_empty());
}

#[test]
fn test_visitor_errors_propagate_and_stop_walk() {
    let (ast, root) = block(vec![Expr::Mark("a"), Expr::Fail, Expr::Mark("c")]);
    let mut strict = Strict { seen: 0 };
    let err = ast
        .node(root)
        .unwrap()
        .accept_children(&mut strict, ())
        .unwrap_err();
    assert_eq!(err.to_string(), "type error: expected statement, got Fail");
    assert_eq!(strict.seen, 2);
}

#[test]
fn test_walk_visits_every_node_once_in_attachment_order() {
    // Script
    //  ├─ Block
    //  │   ├─ Identifier
    //  │   └─ Literal
    //  └─ Assignment
    //      ├─ Identifier
    //      └─ Literal
    let mut ast = parser().tree();
    let script = ast.create(Expr::Script);
    let block = ast.create(Expr::Block);
    let b0 = ast.create(Expr::Identifier("a".into()));
    let b1 = ast.create(Expr::Literal(Value::Int(1)));
    let assign = ast.create(Expr::Assignment);
    let a0 = ast.create(Expr::Identifier("b".into()));
    let a1 = ast.create(Expr::Literal(Value::Int(2)));
    attach(&mut ast, block, &[b0, b1]);
    attach(&mut ast, assign, &[a0, a1]);
    attach(&mut ast, script, &[block, assign]);

    let mut walker = Walker::default();
    let data = ast
        .node(script)
        .unwrap()
        .accept(&mut walker, vec!["ctx"])
        .unwrap();

    assert_eq!(data, vec!["ctx"]);
    assert_eq!(walker.order, vec![script, block, b0, b1, assign, a0, a1]);

    // Children point back at their parents
    for id in &walker.order[1..] {
        let node = ast.node(*id).unwrap();
        let parent = node.parent().unwrap();
        assert!(parent.children().any(|c| c.id() == *id));
    }
}

#[test]
fn test_preorder_names_visitor() {
    let (ast, root) = block(vec![
        Expr::Assignment,
        Expr::Literal(Value::Bool(true)),
    ]);
    let mut names = PreorderNames::default();
    ast.node(root).unwrap().accept(&mut names, ()).unwrap();
    assert_eq!(names.names, vec!["Block", "Assignment", "Literal"]);
}
