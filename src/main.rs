use docopt::Docopt;
use labyrinth::{
    cells::GridCoordinate,
    grid::Labyrinth,
    grid_displays::HighlightDisplay,
    pathing::SearchAlgorithm,
    units::{ColumnLength, RowLength},
};
use log::info;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde_derive::Deserialize;
use std::io::{self, prelude::*};

const USAGE: &str = "Labyrinth

Usage:
    labyrinth_driver -h | --help
    labyrinth_driver [depth-first | depth-first-chain | breadth-first | a-star | all] [options]

Options:
    -h --help               Show this screen.
    --width=<w>             Number of columns in the grid [default: 10].
    --height=<h>            Number of rows in the grid [default: 10].
    --start-column=<c>      Column of the start cell [default: 0].
    --start-row=<r>         Row of the start cell [default: 0].
    --end-column=<c>        Column of the end cell. The last column if not given.
    --end-row=<r>           Row of the end cell. The last row if not given.
    --block-ratio=<p>       Chance of any one cell being blocked [default: 0.14].
    --seed=<n>              Seed for the random layout, so a labyrinth can be generated again.
    --step                  Walk along each path one cell at a time, press Enter to move on.
";
#[derive(Debug, Deserialize)]
struct LabyrinthArgs {
    cmd_depth_first: bool,
    cmd_depth_first_chain: bool,
    cmd_breadth_first: bool,
    cmd_a_star: bool,
    cmd_all: bool,
    flag_width: usize,
    flag_height: usize,
    flag_start_column: u32,
    flag_start_row: u32,
    flag_end_column: Option<u32>,
    flag_end_row: Option<u32>,
    flag_block_ratio: f32,
    flag_seed: Option<u64>,
    flag_step: bool,
}

mod errors {
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
            Grid(::labyrinth::grid::GridError);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    env_logger::init();

    let args: LabyrinthArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let seed = args.flag_seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("labyrinth seed {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let start = GridCoordinate::new(args.flag_start_column, args.flag_start_row);
    let end = GridCoordinate::new(args.flag_end_column.unwrap_or_else(|| last_index(args.flag_width)),
                                  args.flag_end_row.unwrap_or_else(|| last_index(args.flag_height)));

    let mut labyrinth = Labyrinth::generate(RowLength(args.flag_width),
                                            ColumnLength(args.flag_height),
                                            start,
                                            end,
                                            args.flag_block_ratio,
                                            &mut rng)
        .chain_err(|| format!("Failed to generate a {}x{} labyrinth", args.flag_width, args.flag_height))?;

    println!("{}", labyrinth);

    for algorithm in selected_algorithms(&args) {
        labyrinth.clear_path();
        println!("{}", algorithm);

        match labyrinth.find_path(algorithm) {
            Ok(path) => {
                labyrinth.accept_path(path.iter().cloned());
                if args.flag_step {
                    step_through(&labyrinth, &path)?;
                }
                println!("{}", labyrinth);
                println!("{} steps", path.len().saturating_sub(1));
            }
            Err(e) => {
                println!("{}", e);
            }
        }
    }

    Ok(())
}

fn last_index(length: usize) -> u32 {
    length.saturating_sub(1) as u32
}

fn selected_algorithms(args: &LabyrinthArgs) -> Vec<SearchAlgorithm> {
    let chosen = [(args.cmd_depth_first, SearchAlgorithm::DepthFirstPeek),
                  (args.cmd_depth_first_chain, SearchAlgorithm::DepthFirstChain),
                  (args.cmd_breadth_first, SearchAlgorithm::BreadthFirst),
                  (args.cmd_a_star, SearchAlgorithm::AStar)]
        .iter()
        .filter(|&&(selected, _)| selected)
        .map(|&(_, algorithm)| algorithm)
        .collect::<Vec<_>>();

    if args.cmd_all || chosen.is_empty() {
        SearchAlgorithm::ALL.to_vec()
    } else {
        chosen
    }
}

/// Redraw the labyrinth once per path cell with that cell highlighted, waiting for Enter between
/// frames.
fn step_through(labyrinth: &Labyrinth, path: &[GridCoordinate]) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();

    for (index, coord) in path.iter().enumerate() {
        println!("{}", HighlightDisplay::new(labyrinth, *coord));
        print!("{} of {}: {} ", index + 1, path.len(), coord);
        io::stdout().flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            // stdin closed, show the rest without waiting
            println!();
            break;
        }
    }

    Ok(())
}
