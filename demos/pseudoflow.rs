use pseudoflow::maximum_flow::dimacs::{format_result, parse_dimacs, read_dimacs, DimacsProblem};
use pseudoflow::maximum_flow::pseudo_flow::{BucketOrder, Config, PseudoFlow, RootSelection};
use pseudoflow::maximum_flow::status::Status;
use std::fs::File;
use std::io::BufReader;

const SAMPLE: &str = "c sample network
p max 4 5
n 1 s
n 4 t
a 1 2 10
a 1 3 5
a 2 3 15
a 2 4 10
a 3 4 10
";

fn main() {
    env_logger::init();

    let input = std::env::args().nth(1);
    let problem: Result<DimacsProblem<i64>, _> = match input.as_deref() {
        Some(path) => match File::open(path) {
            Ok(file) => read_dimacs(BufReader::new(file)),
            Err(err) => {
                eprintln!("cannot open {path}: {err}");
                std::process::exit(1);
            }
        },
        None => parse_dimacs(SAMPLE),
    };

    let DimacsProblem { mut graph, source, sink } = match problem {
        Ok(problem) => problem,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let config = Config::default().with_root_selection(RootSelection::LowestLabel).with_bucket_order(BucketOrder::Fifo);
    let mut solver = PseudoFlow::new(config);

    match solver.solve(source, sink, &mut graph) {
        Status::BadInput => {
            eprintln!("source and sink must be two different nodes");
            std::process::exit(1);
        }
        status => {
            if let Some(report) = solver.optimality_report() {
                println!("{}", format_result(input.as_deref().unwrap_or("sample network"), solver.config(), report, &graph));
            }
            if status != Status::Optimal {
                eprintln!("solver finished with {status:?}");
            }
            match solver.statistics().to_json() {
                Ok(json) => println!("c {json}"),
                Err(err) => eprintln!("cannot serialize statistics: {err}"),
            }
        }
    }
}
