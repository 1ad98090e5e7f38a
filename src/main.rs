use {
    nanoserde::SerJson,
    nebula::{
        serialization::{json, text, Report},
        solve, Overwriter, SolveOptions,
    },
    std::path::PathBuf,
};

fn main() {
    let mut args = pico_args::Arguments::from_env();
    let json_input = args.contains("--json");
    let report = args.contains("--report");
    let options = SolveOptions {
        memoize: !args.contains("--no-cache"),
        precompute: !args.contains("--lazy"),
    };
    let num_threads: Option<usize> = args
        .opt_value_from_str("--threads")
        .expect("Error parsing number of threads");
    let path: PathBuf = args.free_from_str().expect("Error parsing grid path");

    if let Some(num_threads) = num_threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .unwrap();
    }

    let input = std::fs::read_to_string(&path).expect("Error reading grid file");
    let parsed = if json_input || path.extension().is_some_and(|ext| ext == "json") {
        json::parse(&input)
    } else {
        text::parse(&input)
    };
    let grid = parsed.unwrap_or_else(|err| {
        eprintln!("{}: {err}", path.display());
        std::process::exit(1);
    });

    if !report {
        print!("{}", text::format(grid.view()));
        println!(
            "counting previous states of {}x{} grid...",
            grid.nrows(),
            grid.ncols()
        );
    }

    let mut overwriter = Overwriter::default();
    let now = std::time::Instant::now();
    let solution = solve(grid.view(), options, |i, n| {
        if !report {
            overwriter
                .print(&format!("folding row {i}/{n}"))
                .expect("Error writing progress");
        }
    })
    .unwrap_or_else(|err| {
        eprintln!("\n{}: {err}", path.display());
        std::process::exit(1);
    });
    let time = now.elapsed();

    if report {
        println!(
            "{}",
            Report::new(grid.view(), &solution, time).serialize_json()
        );
        return;
    }

    println!();
    println!("total time: {:?}", time);
    println!(
        "rows reconstructed: {} of {}{}",
        solution.reconstructions,
        solution.rows,
        if solution.transposed {
            " (transposed)"
        } else {
            ""
        }
    );
    println!("count: {}", solution.count);
}
