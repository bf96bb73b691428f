use std::{
    collections::VecDeque,
    io::{self, BufRead},
    sync::mpsc::{self, Receiver, Sender, TryRecvError},
    thread,
    time::Duration,
};

use anyhow::Result;
use log::{error, warn};

use corvid_core::{Color, FEN_STARTPOS};

use crate::config::{DEFAULT_MOVES_TO_GO, DEFAULT_THINK_MS, MATE, MATE_THRESHOLD};
use crate::protocols::{UciCommand, UciInfo, UciResponse, UciScore, UciSearchOptions};
use crate::search::{SearchLimits, SearchReport, Searcher};

/// The engine event loop: reads protocol lines, drives the [`Searcher`], and
/// prints responses.
///
/// A dedicated thread reads `stdin` and feeds lines over a channel, so the
/// search can run on this thread and still see a `stop` arrive mid-search:
/// its stop predicate drains the channel without blocking. Lines that arrive
/// during a search and aren't `stop`/`quit` are queued and handled once the
/// search returns.
pub struct Engine {
    searcher: Searcher,
    receiver: Receiver<String>,
    pending: VecDeque<String>,
    debug: bool,
}

impl Engine {
    /// Creates an engine reading from `stdin`, with the default searcher.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            if let Err(err) = Self::input_handler(sender) {
                error!("stdin reader stopped: {err}");
            }
        });

        Self {
            searcher: Searcher::new(),
            receiver,
            pending: VecDeque::new(),
            debug: false,
        }
    }

    /// Forwards lines from `stdin` into the engine's channel.
    ///
    /// Returns when `stdin` reaches end-of-file (the GUI hung up); dropping
    /// the sender lets both the main loop and a running search notice.
    fn input_handler(sender: Sender<String>) -> Result<()> {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = line?;
            if sender.send(line).is_err() {
                break;
            }
        }
        Ok(())
    }

    /// Main entrypoint: handles commands until `quit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        let name = env!("CARGO_PKG_NAME");
        let version = env!("CARGO_PKG_VERSION");
        let authors = env!("CARGO_PKG_AUTHORS").replace(':', ", ");
        println!("{name} {version} by {authors}");

        while let Some(line) = self.next_line() {
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }

            let cmd = match UciCommand::parse(&line) {
                Ok(cmd) => cmd,
                Err(err) => {
                    // The protocol says to ignore what we don't understand.
                    warn!("{err}");
                    continue;
                }
            };

            if !self.execute(cmd)? {
                break;
            }
        }

        Ok(())
    }

    /// The next line to process: anything queued during a search first, then
    /// a blocking read. `None` once the input stream is gone.
    fn next_line(&mut self) -> Option<String> {
        if let Some(line) = self.pending.pop_front() {
            return Some(line);
        }
        self.receiver.recv().ok()
    }

    /// Executes one command. Returns `false` when the engine should exit.
    fn execute(&mut self, cmd: UciCommand) -> Result<bool> {
        match cmd {
            UciCommand::Uci => {
                let name = format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                let author = env!("CARGO_PKG_AUTHORS").replace(':', ", ");
                println!("{}", UciResponse::Id { name, author });
                println!("{}", UciResponse::UciOk);
            }
            UciCommand::Debug(on) => self.debug = on,
            UciCommand::IsReady => println!("{}", UciResponse::ReadyOk),
            UciCommand::SetOption { name, value } => match value {
                Some(value) => warn!("unrecognized option {name:?} with value {value:?}"),
                None => warn!("unrecognized option {name:?}"),
            },
            UciCommand::UciNewGame => self.searcher.set_fen(FEN_STARTPOS),
            UciCommand::Position { fen, moves } => {
                match fen {
                    Some(fen) => self.searcher.set_fen(&fen),
                    None => self.searcher.set_fen(FEN_STARTPOS),
                }
                for mv in moves {
                    if let Err(err) = self.searcher.apply_uci_move(&mv) {
                        error!("{err}");
                        break;
                    }
                }
            }
            UciCommand::Go(options) => return self.go(options),
            // A search polls for `stop` itself; outside one there is nothing
            // to stop.
            UciCommand::Stop => {}
            UciCommand::Quit => return Ok(false),
        }

        Ok(true)
    }

    /// Runs a search under the options' budget, streaming `info` lines and
    /// finishing with `bestmove`. Returns `false` if `quit` arrived
    /// mid-search.
    fn go(&mut self, options: UciSearchOptions) -> Result<bool> {
        let limits = Self::allocate_time(self.searcher.board().active_color(), &options);

        if self.debug {
            let info = UciInfo::new().string(format!(
                "searching {} with budget {:?}",
                self.searcher.board().to_fen(),
                limits
            ));
            println!("{}", UciResponse::Info(info));
        }

        let receiver = &self.receiver;
        let pending = &mut self.pending;
        let mut quit = false;

        let mut should_stop = || loop {
            match receiver.try_recv() {
                Ok(line) => match line.trim() {
                    "stop" => return true,
                    "quit" => {
                        quit = true;
                        return true;
                    }
                    _ => pending.push_back(line),
                },
                // Input stream gone means the GUI hung up; stop searching.
                Err(TryRecvError::Disconnected) => return true,
                Err(TryRecvError::Empty) => return false,
            }
        };

        let outcome = self
            .searcher
            .get_best_move(limits, &mut should_stop, Self::report_info);

        println!("{}", UciResponse::BestMove(outcome.bestmove.to_uci()));

        Ok(!quit)
    }

    /// Prints one `info` line for a completed depth.
    fn report_info(report: &SearchReport) {
        let score = if report.score > MATE_THRESHOLD {
            UciScore::Mate((MATE - report.score + 1) / 2)
        } else if report.score < -MATE_THRESHOLD {
            UciScore::Mate(-((report.score + MATE + 1) / 2))
        } else {
            UciScore::Cp(report.score)
        };

        let elapsed_ms = report.elapsed.as_millis();
        let nps = if elapsed_ms > 0 {
            report.nodes * 1000 / elapsed_ms as u64
        } else {
            report.nodes
        };

        let info = UciInfo::new()
            .depth(report.depth)
            .score(score)
            .time(elapsed_ms)
            .nodes(report.nodes)
            .nps(nps)
            .pv(report.pv.iter().map(|mv| mv.to_uci()));

        println!("{}", UciResponse::Info(info));
    }

    /// Turns `go` options into a search budget.
    ///
    /// `movetime` is used verbatim. A `depth` bound or `infinite` means no
    /// time limit. Otherwise a slice of the active side's clock is allocated:
    /// `time / movestogo + increment / 2`, clamped to leave 50ms on the clock
    /// and to think at least 10ms. With no clock at all, a fixed default.
    fn allocate_time(active: Color, options: &UciSearchOptions) -> SearchLimits {
        if let Some(movetime) = options.move_time {
            return SearchLimits {
                time: Some(movetime),
                depth: options.depth,
            };
        }

        if options.depth.is_some() || options.infinite {
            return SearchLimits {
                time: None,
                depth: options.depth,
            };
        }

        let (my_time, my_inc) = match active {
            Color::White => (options.w_time, options.w_inc),
            Color::Black => (options.b_time, options.b_inc),
        };

        let my_time = my_time.map_or(0, |time| time.as_millis() as u64);
        let my_inc = my_inc.map_or(0, |inc| inc.as_millis() as u64);

        let think_ms = if my_time > 0 {
            let moves_to_go = options.moves_to_go.unwrap_or(DEFAULT_MOVES_TO_GO).max(1);
            let mut think = my_time / moves_to_go + my_inc / 2;
            if think >= my_time {
                think = my_time.saturating_sub(50);
            }
            think.max(10)
        } else {
            DEFAULT_THINK_MS
        };

        SearchLimits {
            time: Some(Duration::from_millis(think_ms)),
            depth: None,
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn go_options(line: &str) -> UciSearchOptions {
        match UciCommand::parse(line).unwrap() {
            UciCommand::Go(options) => options,
            other => panic!("expected go, got {other:?}"),
        }
    }

    #[test]
    fn test_movetime_is_used_verbatim() {
        let limits = Engine::allocate_time(Color::White, &go_options("go movetime 250"));
        assert_eq!(limits.time, Some(Duration::from_millis(250)));
        assert_eq!(limits.depth, None);
    }

    #[test]
    fn test_depth_and_infinite_have_no_time_limit() {
        let limits = Engine::allocate_time(Color::White, &go_options("go depth 6"));
        assert_eq!(limits.time, None);
        assert_eq!(limits.depth, Some(6));

        let limits = Engine::allocate_time(Color::Black, &go_options("go infinite"));
        assert_eq!(limits.time, None);
        assert_eq!(limits.depth, None);
    }

    #[test]
    fn test_clock_allocation() {
        // 300s / 30 moves + 2s/2 = 11s.
        let limits = Engine::allocate_time(
            Color::White,
            &go_options("go wtime 300000 btime 1 winc 2000 binc 1"),
        );
        assert_eq!(limits.time, Some(Duration::from_millis(11_000)));

        // The black clock is the one that counts for Black.
        let limits = Engine::allocate_time(
            Color::Black,
            &go_options("go wtime 300000 btime 60000 movestogo 20"),
        );
        assert_eq!(limits.time, Some(Duration::from_millis(3_000)));
    }

    #[test]
    fn test_clock_allocation_is_clamped() {
        // Nearly out of time: never allocate the whole clock.
        let limits = Engine::allocate_time(Color::White, &go_options("go wtime 40 movestogo 1"));
        assert_eq!(limits.time, Some(Duration::from_millis(10)));

        let limits = Engine::allocate_time(Color::White, &go_options("go wtime 1000 movestogo 1"));
        assert_eq!(limits.time, Some(Duration::from_millis(950)));
    }

    #[test]
    fn test_bare_go_uses_default_budget() {
        let limits = Engine::allocate_time(Color::White, &go_options("go"));
        assert_eq!(limits.time, Some(Duration::from_millis(DEFAULT_THINK_MS)));
    }
}
