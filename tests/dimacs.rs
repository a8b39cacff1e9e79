use num_traits::NumAssign;
use pseudoflow::maximum_flow::dimacs::{format_result, parse_dimacs, read_dimacs, DimacsError, DimacsProblem};
use pseudoflow::maximum_flow::pseudo_flow::{BucketOrder, Config, OptimalityReport, PseudoFlow, RootSelection, Violation};
use pseudoflow::maximum_flow::status::Status;
use rstest::rstest;
use std::io::Cursor;
use std::str::FromStr;

const FOUR_NODES: &str = "c four node example
p max 4 5
n 1 s
n 4 t
a 1 2 10
a 1 3 5

a 2 3 15
a 2 4 10
a 3 4 10
";

#[test]
fn reads_problem_with_zero_based_ids() {
    let DimacsProblem { graph, source, sink } = read_dimacs::<i64, _>(Cursor::new(FOUR_NODES)).unwrap();

    assert_eq!((source, sink), (0, 3));
    assert_eq!(graph.num_nodes(), 4);
    assert_eq!(graph.num_edges(), 5);
    let edge = graph.get_edge(2).unwrap();
    assert_eq!((edge.from, edge.to, edge.upper, edge.flow), (1, 2, 15, 0));
}

#[test]
fn solves_and_formats_result() {
    let _ = env_logger::builder().is_test(true).try_init();
    let DimacsProblem { mut graph, source, sink } = parse_dimacs::<i64>(FOUR_NODES).unwrap();
    let config = Config::default().with_root_selection(RootSelection::LowestLabel).with_bucket_order(BucketOrder::Fifo);
    let mut solver = PseudoFlow::new(config);

    assert_eq!(solver.solve(source, sink, &mut graph), Status::Optimal);
    let result = format_result("four node example", solver.config(), solver.optimality_report().unwrap(), &graph);
    let lines: Vec<&str> = result.lines().collect();

    assert_eq!(lines[0], "c four node example");
    assert!(lines.contains(&"c Lowest label pseudoflow algorithm"));
    assert!(lines.contains(&"c Using FIFO buckets"));
    assert!(lines.contains(&"c Solution checks as feasible"));
    assert!(lines.contains(&"c Solution checks as optimal"));
    assert!(lines.contains(&"s 15"));

    let flows: Vec<&str> = lines.iter().copied().filter(|line| line.starts_with("f ")).collect();
    assert_eq!(flows.len(), 5);
    assert!(flows[0].starts_with("f 1 2 "));
    assert!(flows[4].starts_with("f 3 4 "));
    let total: i64 = flows[3..].iter().map(|line| line.rsplit(' ').next().unwrap().parse::<i64>().unwrap()).sum();
    assert_eq!(total, 15);
}

#[test]
fn formats_violations_with_one_based_ids() {
    let graph = parse_dimacs::<i64>("p max 3 1\nn 1 s\nn 3 t\na 1 2 4\n").unwrap().graph;
    let report = OptimalityReport {
        minimum_cut: 4,
        maximum_flow: 0,
        gap: 3,
        violations: vec![
            Violation::Conservation { node: 1, excess: 4 },
            Violation::CutMismatch { maximum_flow: 0, minimum_cut: 4 },
        ],
    };

    let result = format_result("broken", &Config::default(), &report, &graph);
    assert!(result.contains("c Highest label pseudoflow algorithm"));
    assert!(result.contains("c Using LIFO buckets"));
    assert!(result.contains("c Flow balance constraint violated in node 2. Excess = 4"));
    assert!(result.contains("c Flow is not optimal - max flow does not equal min cut"));
    assert!(!result.contains("checks as feasible"));
    assert!(result.ends_with("f 1 2 0"));
}

#[test]
fn reads_into_any_flow_type() {
    fn arc_capacities<Flow>(input: &str) -> Vec<Flow>
    where
        Flow: NumAssign + Ord + Copy + FromStr,
    {
        let problem = parse_dimacs::<Flow>(input).unwrap();
        problem.graph.edges().map(|e| e.upper).collect()
    }

    let input = "p max 3 2\nn 1 s\nn 3 t\na 1 2 7\na 2 3 9\n";
    assert_eq!(arc_capacities::<i32>(input), vec![7, 9]);
    assert_eq!(arc_capacities::<i128>(input), vec![7, 9]);
}

#[rstest]
#[case::missing_problem_line("n 1 s\n")]
#[case::duplicate_problem_line("p max 2 0\np max 2 0\n")]
#[case::wrong_problem_kind("p min 2 0\n")]
#[case::unknown_line("p max 2 1\nx 1 2\n")]
#[case::trailing_token("p max 2 1\nn 1 s\nn 2 t\na 1 2 3 4\n")]
#[case::unknown_designator("p max 2 0\nn 1 q\n")]
#[case::node_out_of_range("p max 2 1\nn 1 s\nn 2 t\na 1 3 5\n")]
#[case::node_zero("p max 2 0\nn 0 s\n")]
#[case::missing_source("p max 2 0\nn 2 t\n")]
#[case::missing_sink("p max 2 0\nn 1 s\n")]
#[case::arc_count_mismatch("p max 2 2\nn 1 s\nn 2 t\na 1 2 5\n")]
#[case::invalid_number("p max 2 1\nn 1 s\nn 2 t\na 1 2 five\n")]
#[case::negative_capacity("p max 2 1\nn 1 s\nn 2 t\na 1 2 -5\n")]
#[case::empty_input("")]
fn rejects_malformed_input(#[case] input: &str) {
    assert!(parse_dimacs::<i64>(input).is_err());
}

#[test]
fn errors_carry_line_numbers() {
    let err = parse_dimacs::<i64>("c header\np max 2 1\nn 1 s\nn 2 t\na 1 9 5\n").err().unwrap();
    assert!(matches!(err, DimacsError::NodeOutOfRange { line: 5, node: 9, num_nodes: 2 }));
    assert_eq!(err.to_string(), "line 5: node 9 is out of range 1..=2");

    let err = parse_dimacs::<i64>("p max 2 3\nn 1 s\nn 2 t\na 1 2 5\n").err().unwrap();
    assert!(matches!(err, DimacsError::ArcCountMismatch { expected: 3, found: 1 }));
}
