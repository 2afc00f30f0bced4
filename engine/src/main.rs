/*
  Zugzwang, a UCI-compatible chess engine.
  Copyright (C) 2022 The Zugzwang Authors (see AUTHORS.md file)

  Zugzwang is free software: you can redistribute it and/or modify
  it under the terms of the GNU General Public License as published by
  the Free Software Foundation, either version 3 of the License, or
  (at your option) any later version.

  Zugzwang is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/

//! The UCI front end of Zugzwang.
//!
//! Commands are read line by line from standard input. Searches run on a
//! separate thread so that `stop` can be handled while they think; only
//! protocol messages go to standard output, and logs go to standard error.

use std::{
    io::{stdin, BufRead},
    sync::{Arc, Mutex},
    thread::{spawn, JoinHandle},
    time::Duration,
};

use clap::Parser;
use log::{debug, error, info, warn, LevelFilter};
use zugzwang_base::{movegen::has_moves, perft::divide, Game, Move};
use zugzwang_engine::{
    config::SearchConfig,
    driver::MainSearch,
    limit::{SearchLimit, SearchLimits},
    search::SearchInfo,
    time::get_search_time,
    uci::{parse_line, EngineInfo, GoOption, OptionType, UciCommand, UciMessage},
    SearchError,
};

/// The largest transposition table a user may ask for, in megabytes.
const MAX_HASH_MB: usize = 8192;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Size of the transposition table, in megabytes
    #[arg(long, default_value_t = 64)]
    hash: usize,

    /// Depth to search when `go` is given no limit
    #[arg(long, default_value_t = 7)]
    depth: u8,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let config = SearchConfig {
        depth: args.depth.max(1),
        hash_mb: args.hash.clamp(1, MAX_HASH_MB),
        ..Default::default()
    };
    let main_search = MainSearch::new(config);
    let limit = main_search.limit.clone();
    let searcher = Arc::new(Mutex::new(main_search));
    let mut game = Game::new();
    let mut search_handle = None;
    info!("zugzwang ready: {} MB table, default depth {}", config.hash_mb, config.depth);

    for line in stdin().lock().lines() {
        let line = line?;
        let command = match parse_line(&line) {
            Ok(cmd) => cmd,
            Err(e) => {
                // the protocol says to ignore lines we do not understand
                warn!("failed to parse line `{}`: {e}", line.trim());
                continue;
            }
        };
        debug!("received {command:?}");

        match command {
            UciCommand::Uci => {
                println!(
                    "{}",
                    UciMessage::Id {
                        name: Some("Zugzwang"),
                        author: Some("The Zugzwang Authors"),
                    }
                );
                println!(
                    "{}",
                    UciMessage::Option {
                        name: "Hash",
                        opt: OptionType::Spin {
                            default: 64,
                            min: 1,
                            max: MAX_HASH_MB as i64,
                        },
                    }
                );
                println!(
                    "{}",
                    UciMessage::Option {
                        name: "Clear Hash",
                        opt: OptionType::Button,
                    }
                );
                println!("{}", UciMessage::UciOk);
            }
            UciCommand::Debug(on) => log::set_max_level(match on {
                true => LevelFilter::Debug,
                false => LevelFilter::Info,
            }),
            UciCommand::IsReady => println!("{}", UciMessage::ReadyOk),
            UciCommand::SetOption { name, value } => {
                set_option(&searcher, &limit, &mut search_handle, &name, value.as_deref())?;
            }
            UciCommand::NewGame => {
                stop_search(&limit, &mut search_handle)?;
                game = Game::new();
                searcher.lock().map_err(SearchError::from)?.clear();
            }
            UciCommand::Position { fen, moves } => {
                if let Some(g) = set_up_position(fen.as_deref(), &moves) {
                    game = g;
                }
            }
            UciCommand::Go(opts) => {
                stop_search(&limit, &mut search_handle)?;
                search_handle = go(&searcher, &limit, &game, &opts)?;
            }
            UciCommand::Stop => stop_search(&limit, &mut search_handle)?,
            UciCommand::Quit => {
                stop_search(&limit, &mut search_handle)?;
                break;
            }
            UciCommand::Perft(depth) => print_perft(&game, depth),
        }
    }

    stop_search(&limit, &mut search_handle)?;
    Ok(())
}

/// Install the logger. Logs go to standard error, since standard output is
/// reserved for the protocol. `RUST_LOG` takes precedence over `debug`.
fn init_logging(debug: bool) {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "debug"),
    );
    builder
        .target(env_logger::Target::Stderr)
        .write_style(env_logger::WriteStyle::Never)
        .init();

    // keep debug logs available for `debug on`, but quiet until then
    if !debug && std::env::var_os(env_logger::DEFAULT_FILTER_ENV).is_none() {
        log::set_max_level(LevelFilter::Info);
    }
}

/// Print a string to the GUI as an info message.
fn info_string(s: &str) {
    println!("{}", UciMessage::Info(&[EngineInfo::String(s)]));
}

/// Handle a `setoption` command. A running search is stopped first, since
/// it holds the searcher until it finishes.
fn set_option(
    searcher: &Mutex<MainSearch>,
    limit: &SearchLimit,
    search_handle: &mut Option<JoinHandle<()>>,
    name: &str,
    value: Option<&str>,
) -> Result<(), SearchError> {
    stop_search(limit, search_handle)?;
    match name.to_ascii_lowercase().as_str() {
        "hash" => match value.map(str::parse::<usize>) {
            Some(Ok(mb)) => {
                let mb = mb.clamp(1, MAX_HASH_MB);
                searcher.lock()?.set_hash_mb(mb);
                info!("table resized to {mb} MB");
            }
            _ => warn!("illegal value {value:?} for option `Hash`"),
        },
        "clear hash" => searcher.lock()?.clear(),
        _ => warn!("unknown option `{name}`"),
    }

    Ok(())
}

/// Build the game described by a `position` command. Returns `None`, leaving
/// the position unchanged, if the FEN is malformed. Moves which cannot be
/// played are reported and skipped.
fn set_up_position(fen: Option<&str>, moves: &[String]) -> Option<Game> {
    let mut game = match fen {
        None => Game::new(),
        Some(fen) => match Game::from_fen(fen) {
            Ok(g) => g,
            Err(e) => {
                warn!("unable to load FEN `{fen}`: {e}");
                info_string("invalid fen");
                return None;
            }
        },
    };

    for tok in moves {
        let played = Move::from_uci(tok)
            .map_err(|e| e.to_string())
            .and_then(|m| game.try_move(m).map_err(|e| e.to_string()));
        if let Err(e) = played {
            warn!("skipping move `{tok}`: {e}");
            info_string(&format!("illegal move {tok}"));
        }
    }

    Some(game)
}

/// Convert the options of a `go` command into a budget for a search.
fn search_limits(opts: &[GoOption], game: &Game) -> SearchLimits {
    let mut limits = SearchLimits::default();

    // time remaining for players
    let (mut wtime, mut btime) = (None, None);
    // increments. by default assumed to be zero
    let (mut winc, mut binc) = (0, 0);
    let mut movestogo = None;
    let mut mate_depth = None;

    for &opt in opts {
        match opt {
            GoOption::WhiteTime(time) => wtime = Some(time),
            GoOption::BlackTime(time) => btime = Some(time),
            GoOption::WhiteInc(inc) => winc = inc,
            GoOption::BlackInc(inc) => binc = inc,
            GoOption::MovesToGo(n) => movestogo = Some(n),
            GoOption::Depth(d) => limits.depth = Some(d),
            GoOption::Nodes(n) => limits.nodes = Some(n),
            // a mate in n moves is found within 2n - 1 plies
            GoOption::Mate(n) => {
                mate_depth = Some(n.saturating_mul(2).saturating_sub(1).max(1));
            }
            GoOption::MoveTime(msecs) => {
                limits.movetime = Some(Duration::from_millis(u64::from(msecs)));
            }
            GoOption::Infinite | GoOption::Ponder => limits.infinite = true,
        }
    }

    if limits.depth.is_none() {
        limits.depth = mate_depth;
    }
    if limits.movetime.is_none() && (wtime.is_some() || btime.is_some()) {
        limits.movetime = Some(get_search_time(
            movestogo,
            (winc, binc),
            (wtime.unwrap_or(0), btime.unwrap_or(0)),
            game.board().player_to_move,
        ));
    }

    limits
}

/// Handle a `go` command. Roots which need no search are answered at once;
/// otherwise the search is started on a new thread, whose handle is
/// returned.
fn go(
    searcher: &Arc<Mutex<MainSearch>>,
    limit: &SearchLimit,
    game: &Game,
    opts: &[GoOption],
) -> Result<Option<JoinHandle<()>>, SearchError> {
    if !has_moves(game.board()) {
        info_string(match game.board().is_king_checked() {
            true => "checkmate",
            false => "stalemate",
        });
        println!("{}", UciMessage::BestMove { m: Move::NULL, ponder: None });
        return Ok(None);
    }
    if game.is_drawn_by_rule() {
        info_string("draw by rule");
        println!("{}", UciMessage::BestMove { m: Move::NULL, ponder: None });
        return Ok(None);
    }

    let limits = search_limits(opts, game);
    debug!("searching with {limits:?}");
    // start here, so that a `stop` right after `go` is not lost
    limit.start(&limits)?;

    let searcher = searcher.clone();
    let g = game.clone();
    Ok(Some(spawn(move || {
        if let Err(e) = search_and_report(&searcher, &g, &limits) {
            error!("search failed: {e}");
            println!("{}", UciMessage::BestMove { m: Move::NULL, ponder: None });
        }
    })))
}

/// Run a search which has already been started, printing its progress and
/// then its best move.
fn search_and_report(
    searcher: &Mutex<MainSearch>,
    g: &Game,
    limits: &SearchLimits,
) -> Result<(), SearchError> {
    let mut main_search = searcher.lock()?;
    let info = main_search.run(g, limits, print_depth_info)?;
    info_string(&format!(
        "tthit {}/{}",
        main_search.ttable.hits(),
        main_search.ttable.probes()
    ));
    println!(
        "{}",
        UciMessage::BestMove {
            m: info.best_move,
            ponder: info.pv.get(1).copied(),
        }
    );

    Ok(())
}

/// Inform the GUI of a completed iteration.
fn print_depth_info(info: &SearchInfo) {
    println!(
        "{}",
        UciMessage::Info(&[
            EngineInfo::Depth(info.depth),
            EngineInfo::SelDepth(info.selective_depth),
            EngineInfo::Time(info.elapsed),
            EngineInfo::Nodes(info.num_nodes_evaluated),
            EngineInfo::NodeSpeed(info.nodes_per_second()),
            EngineInfo::HashFull(info.hashfull),
            EngineInfo::Score {
                eval: info.eval,
                is_lower_bound: false,
                is_upper_bound: false,
            },
            EngineInfo::Pv(&info.pv),
        ])
    );
}

/// Stop the running search, if any, and wait for it to report its move.
fn stop_search(limit: &SearchLimit, handle: &mut Option<JoinHandle<()>>) -> Result<(), SearchError> {
    limit.stop();
    if let Some(h) = handle.take() {
        h.join().map_err(|_| SearchError::Join)?;
    }

    Ok(())
}

/// Handle a `perft` command, counting the leaves below each root move.
fn print_perft(game: &Game, depth: u8) {
    let mut board = *game.board();
    let (counts, secs) = divide(&mut board, depth);
    for (m, count) in &counts {
        println!("{m}: {count}");
    }
    // the root alone is the only leaf at depth 0
    let total: u64 = match depth {
        0 => 1,
        _ => counts.iter().map(|&(_, count)| count).sum(),
    };
    println!(
        "nodes {total} time {} nps {}",
        (secs * 1000.) as u64,
        (total as f64 / secs.max(1e-9)) as u64
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Test that setting an option during an infinite search stops the
    /// search instead of waiting on it forever.
    fn set_option_stops_search() {
        let main_search = MainSearch::new(SearchConfig {
            hash_mb: 1,
            ..Default::default()
        });
        let limit = main_search.limit.clone();
        let searcher = Arc::new(Mutex::new(main_search));
        let mut handle = go(&searcher, &limit, &Game::new(), &[GoOption::Infinite]).unwrap();
        assert!(handle.is_some());

        set_option(&searcher, &limit, &mut handle, "Hash", Some("2")).unwrap();
        assert!(handle.is_none());
        assert!(searcher.try_lock().is_ok());
    }

    #[test]
    /// Test that `go mate n` searches `2n - 1` plies, and that an explicit
    /// depth wins.
    fn mate_limits_depth() {
        let game = Game::new();
        assert_eq!(search_limits(&[GoOption::Mate(3)], &game).depth, Some(5));
        assert_eq!(
            search_limits(&[GoOption::Mate(3), GoOption::Depth(2)], &game).depth,
            Some(2)
        );
        assert_eq!(search_limits(&[GoOption::Mate(0)], &game).depth, Some(1));
    }
}
