// End-to-end scenarios: CSV text in, scene payload out.

use std::sync::Arc;
use std::thread;
use transaction_network::{
    build_scene, load_accounts, load_transactions, AccountRecord, InMemoryDataSource, LayoutKind,
    NetworkPipeline, SceneStyle, TraceKind, YearRange,
};

const EDGES: &str = "\
Source,Target,TransactionAmt,Date
A,B,100,01/01/2015
B,C,50,01/01/2015
A,C,200,01/01/2012
";

const NODES: &str = "\
Account,CustomerName,Type
A,Alice,Checking
B,Bob,Savings
C,Carol,Credit
";

fn pipeline_from_csv(edges: &str, nodes: &str) -> NetworkPipeline {
    let transactions = load_transactions(edges.as_bytes()).unwrap();
    let accounts: Vec<AccountRecord> = csv::Reader::from_reader(nodes.as_bytes())
        .deserialize()
        .collect::<Result<_, _>>()
        .unwrap();
    NetworkPipeline::new(
        Box::new(InMemoryDataSource::new(transactions, accounts)),
        SceneStyle::default(),
    )
}

#[test]
fn test_three_account_window() {
    let pipeline = pipeline_from_csv(EDGES, NODES);
    let scene = pipeline
        .compute_scene(YearRange::new(2014, 2016).unwrap(), "A")
        .unwrap();

    assert_eq!(scene.layout_kind, Some(LayoutKind::Shell));

    let lines = scene.traces_of(TraceKind::Line).collect::<Vec<_>>();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].line.as_ref().unwrap().width, 10.0);
    assert_eq!(lines[1].line.as_ref().unwrap().width, 5.0);

    let nodes = scene.traces_of(TraceKind::MarkerText).next().unwrap();
    let mut ids = nodes.text.clone();
    ids.sort();
    assert_eq!(ids, vec!["A", "B", "C"]);

    // queried account sits on the center of the shells
    let a = nodes.text.iter().position(|id| id == "A").unwrap();
    assert!(nodes.x[a].unwrap().abs() < 1e-9);
    assert!(nodes.y[a].unwrap().abs() < 1e-9);

    assert_eq!(scene.layout.annotations.len(), 2);
}

#[test]
fn test_account_without_transactions_in_window() {
    let pipeline = pipeline_from_csv(EDGES, NODES);
    let scene = pipeline
        .compute_scene(YearRange::new(2018, 2019).unwrap(), "A")
        .unwrap();

    let summary = scene.summary();
    assert_eq!(summary.marker_traces, 2);
    assert_eq!(summary.line_traces, 0);
    assert_eq!(summary.annotations, 0);
    assert_eq!(summary.hover_points, 0);
    assert_eq!(scene.layout_kind, None);
}

#[test]
fn test_annotation_count_matches_parallel_edges() {
    let edges = "\
Source,Target,TransactionAmt,Date
A,B,10,01/01/2015
A,B,20,02/01/2015
B,A,30,03/01/2015
A,C,40,04/01/2015
";
    let pipeline = pipeline_from_csv(edges, NODES);
    let scene = pipeline
        .compute_scene(YearRange::new(2015, 2015).unwrap(), "A")
        .unwrap();

    let summary = scene.summary();
    assert_eq!(summary.line_traces, 4);
    assert_eq!(summary.hover_points, 4);
    assert_eq!(summary.annotations, 4);
    assert_eq!(summary.node_points, 3);
}

#[test]
fn test_malformed_date_fails_the_call() {
    let edges = "\
Source,Target,TransactionAmt,Date
A,B,10,2015-01-01
";
    let pipeline = pipeline_from_csv(edges, NODES);

    assert!(pipeline
        .compute_scene(YearRange::new(2010, 2019).unwrap(), "A")
        .is_err());
}

#[test]
fn test_missing_metadata_renders_placeholder() {
    let edges = "\
Source,Target,TransactionAmt,Date
A,X,10,01/01/2015
A,Y,10,01/01/2015
";
    let transactions = load_transactions(edges.as_bytes()).unwrap();
    let accounts = load_accounts(NODES.as_bytes()).unwrap();

    let scene = build_scene(
        &transactions,
        &accounts,
        YearRange::new(2015, 2015).unwrap(),
        "A",
        &SceneStyle::default(),
    )
    .unwrap();

    let nodes = scene.traces_of(TraceKind::MarkerText).next().unwrap();
    let x = nodes.text.iter().position(|id| id == "X").unwrap();
    assert_eq!(nodes.hovertext[x], "CustomerName: None<br>AccountType: None");
}

#[test]
fn test_scene_json_is_plotly_shaped() {
    let pipeline = pipeline_from_csv(EDGES, NODES);
    let scene = pipeline
        .compute_scene(YearRange::new(2014, 2016).unwrap(), "A")
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&scene.to_json(false).unwrap()).unwrap();
    let data = value["data"].as_array().unwrap();

    assert_eq!(data.len(), 4);
    assert_eq!(data[0]["mode"], "lines");
    assert_eq!(data[0]["x"][2], serde_json::Value::Null);
    assert_eq!(data[2]["mode"], "markers+text");
    assert_eq!(data[3]["opacity"], 0.0);
    assert_eq!(value["layout"]["hovermode"], "closest");
    assert_eq!(value["layout"]["clickmode"], "event+select");
}

#[test]
fn test_edges_follow_source_grouping_end_to_end() {
    let edges = "\
Source,Target,TransactionAmt,Date
A,B,10,01/01/2015
B,C,20,01/01/2015
A,D,30,01/01/2015
";
    let pipeline = pipeline_from_csv(edges, NODES);
    let scene = pipeline
        .compute_scene(YearRange::new(2015, 2015).unwrap(), "A")
        .unwrap();

    let middles = scene.traces_of(TraceKind::HoverMarker).next().unwrap();
    assert_eq!(
        middles.hovertext[1],
        "From: A<br>To: D<br>TransactionAmt: 30.0<br>TransactionDate: 01/01/2015"
    );
}

#[test]
fn test_shared_pipeline_across_threads() {
    let pipeline = Arc::new(pipeline_from_csv(EDGES, NODES));
    let queries = [
        (YearRange::new(2014, 2016).unwrap(), "A"),
        (YearRange::new(2010, 2019).unwrap(), "C"),
        (YearRange::new(2018, 2019).unwrap(), "B"),
    ];
    let expected = queries
        .iter()
        .map(|(years, account)| pipeline.compute_scene(*years, account).unwrap())
        .collect::<Vec<_>>();

    let handles = (0..8)
        .map(|i| {
            let pipeline = Arc::clone(&pipeline);
            let (years, account) = queries[i % queries.len()];
            thread::spawn(move || (i, pipeline.compute_scene(years, account).unwrap()))
        })
        .collect::<Vec<_>>();

    for handle in handles {
        let (i, scene) = handle.join().unwrap();
        assert_eq!(scene, expected[i % queries.len()]);
    }
}
