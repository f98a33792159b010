#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use crate::{build_graph, DirectiveEngine, DirectiveTable};
use pretty_assertions::assert_eq;
use wiregen_diagnostic::ErrorCode;
use wiregen_ir::{Declaration, Field, FieldDecl, Primitive, ShapeExpr};

fn ident(name: &str) -> ShapeExpr {
    ShapeExpr::ident(name)
}

fn decl(name: &str, fields: Vec<FieldDecl>) -> Declaration {
    Declaration::new(name, ShapeExpr::structure(fields))
}

fn point() -> Declaration {
    decl("Point", vec![FieldDecl::group(["X", "Y"], ident("int32"))])
}

fn graph_of(decls: &[Declaration]) -> SchemaGraph {
    build_graph(decls, &mut Diagnostics::new()).unwrap()
}

fn optimize(graph: &mut SchemaGraph, config: &SchemaConfig) -> (InlineStats, Diagnostics) {
    let mut diags = Diagnostics::new();
    let stats = InlineOptimizer::new(config).run(graph, &mut diags).unwrap();
    (stats, diags)
}

/// Child handle of field `index` of the struct declared as `name`.
fn field(graph: &SchemaGraph, name: &str, index: usize) -> NodeId {
    match &graph.node(name).unwrap().kind {
        TypeKind::Struct(fields) => fields[index].child,
        other => panic!("{name} is not a struct: {other:?}"),
    }
}

fn formatted(graph: &SchemaGraph) -> Vec<(String, String)> {
    graph
        .names()
        .into_iter()
        .map(|name| (name.to_owned(), graph.format(name).unwrap()))
        .collect()
}

// Inlining

#[test]
fn point_inlines_into_line() {
    let mut graph = graph_of(&[
        point(),
        decl(
            "Line",
            vec![
                FieldDecl::named("A", ident("Point")),
                FieldDecl::named("B", ident("Point")),
            ],
        ),
    ]);
    assert_eq!(graph.arena().complexity(graph.get("Point").unwrap()), 3);

    let (stats, diags) = optimize(&mut graph, &SchemaConfig::default());
    assert_eq!(stats.inlined, 2);
    assert!(diags.is_empty());
    assert_eq!(
        graph.format("Line").as_deref(),
        Some("struct{A struct{X int32, Y int32}, B struct{X int32, Y int32}}")
    );
    assert_eq!(graph.format("Point").as_deref(), Some("struct{X int32, Y int32}"));

    let point = graph.get("Point").unwrap();
    let a = graph.arena().descendants(field(&graph, "Line", 0));
    let b = graph.arena().descendants(field(&graph, "Line", 1));
    let p = graph.arena().descendants(point);
    assert!(a.iter().all(|id| !b.contains(id) && !p.contains(id)));
    assert!(b.iter().all(|id| !p.contains(id)));
}

#[test]
fn simple_alias_becomes_primitive() {
    let mut graph = graph_of(&[
        decl("A", vec![FieldDecl::named("X", ident("B"))]),
        Declaration::new("B", ident("int32")),
    ]);
    optimize(&mut graph, &SchemaConfig::default());
    assert_eq!(
        graph.arena().kind(field(&graph, "A", 0)),
        &TypeKind::Primitive(Primitive::Int32)
    );
}

#[test]
fn self_reference_through_pointer_is_kept() {
    let mut graph = graph_of(&[decl(
        "List",
        vec![
            FieldDecl::named("Next", ShapeExpr::pointer(ident("List"))),
            FieldDecl::named("Value", ident("int")),
        ],
    )]);
    let (stats, diags) = optimize(&mut graph, &SchemaConfig::default());
    assert_eq!(stats.inlined, 0);
    assert!(diags.is_empty());
    assert_eq!(graph.format("List").as_deref(), Some("struct{Next *List, Value int}"));
}

#[test]
fn chains_inline_fully() {
    let mut graph = graph_of(&[
        decl("A", vec![FieldDecl::named("X", ident("B"))]),
        decl("B", vec![FieldDecl::named("Y", ident("C"))]),
        decl("C", vec![FieldDecl::named("Z", ident("int8"))]),
    ]);
    optimize(&mut graph, &SchemaConfig::default());
    assert_eq!(
        graph.format("A").as_deref(),
        Some("struct{X struct{Y struct{Z int8}}}")
    );
    assert_eq!(graph.format("B").as_deref(), Some("struct{Y struct{Z int8}}"));
}

#[test]
fn chain_never_reintroduces_an_enclosing_declaration() {
    let mut graph = graph_of(&[
        decl("A", vec![FieldDecl::named("X", ident("B"))]),
        decl("B", vec![FieldDecl::named("Y", ShapeExpr::pointer(ident("C")))]),
        decl("C", vec![FieldDecl::named("Z", ShapeExpr::pointer(ident("B")))]),
    ]);
    let (_, diags) = optimize(&mut graph, &SchemaConfig::default());
    assert!(diags.is_empty());
    assert_eq!(
        formatted(&graph),
        vec![
            ("A".into(), "struct{X struct{Y *struct{Z *B}}}".into()),
            ("B".into(), "struct{Y *struct{Z *B}}".into()),
            // B has grown past the threshold by the time C is visited.
            ("C".into(), "struct{Z *B}".into()),
        ]
    );
}

#[test]
fn alias_declarations_are_chased() {
    let mut graph = graph_of(&[
        Declaration::new("Alias", ident("Point")),
        decl(
            "Point",
            vec![FieldDecl::named("Next", ShapeExpr::pointer(ident("Alias")))],
        ),
        decl("Line", vec![FieldDecl::named("A", ident("Alias"))]),
    ]);
    let optimizer = InlineOptimizer::new(&SchemaConfig::default());
    let mut diags = Diagnostics::new();
    optimizer.inline(&mut graph, &mut diags).unwrap();
    assert_eq!(
        formatted(&graph),
        vec![
            ("Alias".into(), "Point".into()),
            ("Line".into(), "struct{A struct{Next *Point}}".into()),
            ("Point".into(), "struct{Next *Point}".into()),
        ]
    );
    assert_eq!(optimizer.inline(&mut graph, &mut diags).unwrap(), 0);
}

#[test]
fn alias_cycle_terminates() {
    let mut graph = graph_of(&[
        Declaration::new("A", ident("B")),
        Declaration::new("B", ident("A")),
        decl("User", vec![FieldDecl::named("X", ident("A"))]),
    ]);
    let (_, diags) = optimize(&mut graph, &SchemaConfig::default());
    assert!(diags.is_empty());
    assert_eq!(graph.format("User").as_deref(), Some("struct{X A}"));
}

#[test]
fn complex_declarations_stay_referenced() {
    let decls = [
        decl(
            "Big",
            vec![FieldDecl::group(["A", "B", "C", "D"], ident("string"))],
        ),
        decl("Holder", vec![FieldDecl::named("Inner", ident("Big"))]),
    ];
    let mut graph = graph_of(&decls);
    assert_eq!(graph.arena().complexity(graph.get("Big").unwrap()), 5);
    optimize(&mut graph, &SchemaConfig::default());
    assert_eq!(graph.format("Holder").as_deref(), Some("struct{Inner Big}"));

    let mut graph = graph_of(&decls);
    optimize(&mut graph, &SchemaConfig::default().with_max_complexity(6));
    assert_eq!(
        graph.format("Holder").as_deref(),
        Some("struct{Inner struct{A string, B string, C string, D string}}")
    );
}

#[test]
fn inlining_is_idempotent() {
    let mut graph = graph_of(&[
        point(),
        decl(
            "Line",
            vec![
                FieldDecl::named("A", ident("Point")),
                FieldDecl::named("B", ShapeExpr::slice(ident("Point"))),
            ],
        ),
        decl("Node", vec![FieldDecl::named("Next", ShapeExpr::pointer(ident("Node")))]),
        decl("Wrap", vec![FieldDecl::named("N", ident("Node"))]),
        decl("P", vec![FieldDecl::named("Q", ShapeExpr::pointer(ident("Q")))]),
        decl("Q", vec![FieldDecl::named("P", ShapeExpr::pointer(ident("P")))]),
    ]);
    let optimizer = InlineOptimizer::new(&SchemaConfig::default());
    let mut diags = Diagnostics::new();
    assert!(optimizer.inline(&mut graph, &mut diags).unwrap() > 0);
    let first = formatted(&graph);
    let nodes = graph.arena().len();

    assert_eq!(optimizer.inline(&mut graph, &mut diags).unwrap(), 0);
    assert_eq!(formatted(&graph), first);
    assert_eq!(graph.arena().len(), nodes);
}

#[test]
fn inlined_site_keeps_its_varname() {
    let mut graph = graph_of(&[
        point(),
        decl("Line", vec![FieldDecl::named("A", ident("Point"))]),
    ]);
    let site = field(&graph, "Line", 0);
    graph.arena_mut().set_varname(site, "za0001");
    let point = graph.get("Point").unwrap();
    graph.arena_mut().set_varname(point, "z");

    optimize(&mut graph, &SchemaConfig::default());
    assert_eq!(field(&graph, "Line", 0), site);
    assert!(graph.arena().kind(site).is_struct());
    assert_eq!(graph.arena().get(site).varname.as_deref(), Some("za0001"));
    assert_eq!(graph.arena().get(point).varname.as_deref(), Some("z"));
}

#[test]
fn unresolved_reported_once() {
    let mut diags = Diagnostics::new();
    let mut graph = build_graph(
        &[decl(
            "A",
            vec![
                FieldDecl::named("X", ShapeExpr::selector("pkg", "Thing")),
                FieldDecl::named("Y", ShapeExpr::slice(ShapeExpr::selector("pkg", "Thing"))),
                FieldDecl::named("Z", ident("Missing")),
                FieldDecl::named("W", ShapeExpr::selector("msgp", "Raw")),
            ],
        )],
        &mut diags,
    )
    .unwrap();
    assert_eq!(diags.len(), 1);

    InlineOptimizer::new(&SchemaConfig::default())
        .run(&mut graph, &mut diags)
        .unwrap();
    let subjects: Vec<_> = diags
        .with_code(ErrorCode::W1003)
        .map(|d| d.subject.clone().unwrap())
        .collect();
    assert_eq!(subjects, vec!["Missing", "pkg.Thing"]);
}

#[test]
fn removed_declaration_becomes_unresolved() {
    let mut graph = graph_of(&[
        point(),
        decl(
            "Line",
            vec![
                FieldDecl::named("A", ident("Point")),
                FieldDecl::named("B", ShapeExpr::slice(ident("Point"))),
            ],
        ),
    ]);
    graph.remove("Point");

    let (stats, diags) = optimize(&mut graph, &SchemaConfig::default());
    assert_eq!(stats.inlined, 0);
    let subjects: Vec<_> = diags
        .with_code(ErrorCode::W1003)
        .map(|d| d.subject.clone().unwrap())
        .collect();
    assert_eq!(subjects, vec!["Point"]);
    assert_eq!(
        graph.arena().kind(field(&graph, "Line", 0)),
        &TypeKind::Identifier {
            name: "Point".into(),
            resolved: false,
        }
    );
}

#[test]
fn dropped_declaration_becomes_unresolved() {
    let mut diags = Diagnostics::new();
    let mut graph = build_graph(
        &[
            Declaration::new("Handler", ShapeExpr::Other("func()".into())),
            decl("User", vec![FieldDecl::named("H", ident("Handler"))]),
        ],
        &mut diags,
    )
    .unwrap();
    assert_eq!(diags.with_code(ErrorCode::W1003).count(), 0);

    InlineOptimizer::new(&SchemaConfig::default())
        .run(&mut graph, &mut diags)
        .unwrap();
    let codes: Vec<_> = diags.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::W1001, ErrorCode::W1003]);
    assert_eq!(graph.format("User").as_deref(), Some("struct{H Handler}"));
}

#[test]
fn handle_shared_with_entry_is_a_cycle() {
    let mut graph = SchemaGraph::new();
    let shared = graph.arena_mut().alloc_kind(TypeKind::Identifier {
        name: "T".into(),
        resolved: true,
    });
    let root = graph.arena_mut().alloc_kind(TypeKind::Struct(vec![Field {
        wire_tag: "F".into(),
        name: "F".into(),
        child: shared,
    }]));
    graph.insert("R", root);
    graph.insert("T", shared);

    let err = InlineOptimizer::new(&SchemaConfig::default())
        .run(&mut graph, &mut Diagnostics::new())
        .unwrap_err();
    assert_eq!(err, SchemaError::InlineCycle { name: "T".into() });
    assert_eq!(err.code(), ErrorCode::E9002);
}

#[test]
fn disabled_inlining_leaves_identifiers() {
    let mut graph = graph_of(&[
        point(),
        decl("Line", vec![FieldDecl::named("A", ident("Point"))]),
    ]);
    let (stats, _) = optimize(&mut graph, &SchemaConfig::no_inlining());
    assert_eq!(stats, InlineStats::default());
    assert_eq!(graph.format("Line").as_deref(), Some("struct{A Point}"));
}

// Shims

fn shimmed(decls: &[Declaration], config: &SchemaConfig) -> (SchemaGraph, InlineStats) {
    let mut graph = graph_of(decls);
    let table = DirectiveTable::builtin();
    let mut diags = Diagnostics::new();
    DirectiveEngine::new(&table).apply(
        &mut graph,
        &["shim Color as:string using:colorToString/colorFromString"],
        &mut diags,
    );
    assert!(diags.is_empty());
    let (stats, _) = optimize(&mut graph, config);
    (graph, stats)
}

fn palette() -> Vec<Declaration> {
    vec![
        Declaration::new("Color", ident("uint8")),
        decl(
            "Palette",
            vec![
                FieldDecl::named("Colors", ShapeExpr::slice(ident("Color"))),
                FieldDecl::named("Main", ShapeExpr::pointer(ident("Color"))),
            ],
        ),
    ]
}

#[test]
fn shim_replaces_every_reference_and_the_entry() {
    let (graph, stats) = shimmed(&palette(), &SchemaConfig::no_inlining());
    assert_eq!(stats.shimmed, 3);
    assert_eq!(
        formatted(&graph),
        vec![
            ("Color".into(), "Color as string".into()),
            (
                "Palette".into(),
                "struct{Colors []Color as string, Main *Color as string}".into()
            ),
        ]
    );
}

#[test]
fn shim_copies_are_independent() {
    let (mut graph, _) = shimmed(&palette(), &SchemaConfig::default());
    let TypeKind::Slice(colors) = *graph.arena().kind(field(&graph, "Palette", 0)) else {
        panic!("expected slice");
    };
    let TypeKind::Ptr(main) = *graph.arena().kind(field(&graph, "Palette", 1)) else {
        panic!("expected pointer");
    };
    let entry = graph.get("Color").unwrap();
    let template = graph.shims()[0].node;
    assert!(graph.arena().same_shape(colors, main));
    assert!(graph.arena().same_shape(colors, template));

    graph.arena_mut().set_varname(colors, "el");
    for other in [main, entry, template] {
        assert_ne!(other, colors);
        assert_eq!(graph.arena().get(other).varname, None);
    }
}

#[test]
fn inlining_runs_after_shims() {
    let mut decls = palette();
    decls.push(decl("Swatch", vec![FieldDecl::named("C", ident("Color"))]));
    decls.push(decl("Card", vec![FieldDecl::named("S", ident("Swatch"))]));
    let (graph, stats) = shimmed(&decls, &SchemaConfig::default());
    assert_eq!(stats.inlined, 1);
    assert_eq!(
        graph.format("Card").as_deref(),
        Some("struct{S struct{C Color as string}}")
    );
    // The shim node is final even though `Color` is now a tiny declaration.
    assert_eq!(
        graph.format("Swatch").as_deref(),
        Some("struct{C Color as string}")
    );
}

#[test]
fn shim_for_undeclared_name_only_touches_references() {
    let mut graph = graph_of(&[decl(
        "Event",
        vec![FieldDecl::named("At", ShapeExpr::selector("clock", "Stamp"))],
    )]);
    let mut diags = Diagnostics::new();
    DirectiveEngine::new(&DirectiveTable::builtin()).apply(
        &mut graph,
        &["shim clock.Stamp as:int64 using:stampToInt/intToStamp"],
        &mut diags,
    );
    let (stats, diags) = optimize(&mut graph, &SchemaConfig::default());
    assert_eq!(stats.shimmed, 1);
    assert!(diags.is_empty());
    assert_eq!(graph.names(), vec!["Event"]);
    assert_eq!(
        graph.format("Event").as_deref(),
        Some("struct{At clock.Stamp as int64}")
    );
}
