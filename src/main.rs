use clap::{Parser, ValueEnum};
use gmatch::core::{Edge, Instance, Matcher};
use gmatch::{algo, data, run_reader};
use rand::prelude::*;
use std::io::Write;
use std::num::NonZero;

#[derive(Copy, Clone, Debug)]
struct Algorithm(usize, &'static str);

impl From<Algorithm> for Box<dyn Matcher> {
    fn from(value: Algorithm) -> Box<dyn Matcher> {
        algo::MATCHERS[value.0]()
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.1)
    }
}

impl ValueEnum for Algorithm {
    fn value_variants<'a>() -> &'a [Self] {
        static ALGORITHMS: std::sync::LazyLock<Vec<Algorithm>> = std::sync::LazyLock::new(|| {
            let iter = algo::MATCHERS.iter().enumerate();
            iter.map(|(i, init)| Algorithm(i, init().name())).collect()
        });

        ALGORITHMS.as_slice()
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.1))
    }
}

/// Application computing maximum-cardinality matchings in general graphs.
#[derive(Debug, Parser)]
enum Application {
    /// Run one of the implemented algorithms on an instance read from stdin.
    Run { algorithm: Algorithm },
    /// Run benchmarks on a set of instances.
    Bench {
        /// The input directory.
        input: String,
        /// Exclude matching algorithms.
        #[clap(short, long, value_delimiter = ',')]
        exclude: Vec<Algorithm>,
        /// Check matching sizes against the expected values from filenames.
        #[clap(short, long)]
        check: bool,
        /// Write the reports as JSON to the given file.
        #[clap(short, long)]
        report: Option<String>,
    },
    /// Generate test cases for the matching problem.
    Gen {
        /// The number of vertices.
        vertices: NonZero<usize>,
        /// Edge density. 1.0 means the complete graph.
        #[clap(short, long, default_value = "0.3")]
        density: f64,
        /// Number of test cases to generate.
        #[clap(short, long, default_value = "1")]
        amount: NonZero<u64>,
        /// Path to output the generated instances. If the directory does not exist, it will be created.
        #[clap(short, long, default_value = "output")]
        output: String,
        /// Seed for the random number generator.
        #[clap(short, long)]
        seed: Option<u64>,
    },
}

fn matchers(exclude: &[Algorithm]) -> impl Iterator<Item = Box<dyn Matcher>> + '_ {
    let iter = algo::MATCHERS.iter().map(|init| init());
    iter.filter(|matcher| !exclude.iter().any(|name| name.1 == matcher.name()))
}

fn gen_edges(vertices: usize, density: f64, rng: &mut StdRng) -> Vec<Edge> {
    let all = (vertices * (vertices - 1)) / 2;
    let required = ((all as f64 * density).ceil() as usize).min(all);
    (0..vertices)
        .flat_map(|u| (u + 1..vertices).map(move |v| Edge(u, v)))
        .choose_multiple(rng, required)
}

fn main() -> anyhow::Result<()> {
    match Application::parse() {
        Application::Run { algorithm } => {
            let mut matcher = Box::<dyn Matcher>::from(algorithm);
            run_reader(matcher.as_mut(), &mut std::io::stdin().lock())
        }
        Application::Bench {
            input,
            exclude,
            check,
            report,
        } => {
            let mut reports = Vec::new();
            for mut matcher in matchers(&exclude) {
                let result = data::run(&input, check, matcher.as_mut())?;
                println!("{result}");
                reports.push(result);
            }
            if let Some(path) = report {
                serde_json::to_writer_pretty(std::fs::File::create(path)?, &reports)?;
            }
            Ok(())
        }
        Application::Gen {
            vertices,
            density,
            amount,
            output,
            seed,
        } => {
            let vertices = vertices.get();
            let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

            let output = std::path::Path::new(&output);
            if !output.try_exists()? {
                std::fs::create_dir_all(output)?;
            }

            for i in 0..amount.get() {
                let instance = Instance::new(vertices, gen_edges(vertices, density, &mut rng));
                let pairs = algo::Blossom.matching(&instance).pairs();
                let filename = format!("{vertices}_{pairs}_{i}.in");
                std::fs::File::create(output.join(filename))?
                    .write_all(instance.to_string().as_bytes())?;
            }
            Ok(())
        }
    }
}
