use std::{fmt, str::FromStr, time::Duration};

use anyhow::{anyhow, bail, Result};
use log::warn;

/// Represents the arguments that can be sent to the engine via the `go` command.
///
/// Unknown or unsupported `go` tokens are ignored during parsing, as the
/// protocol asks.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct UciSearchOptions {
    /// `wtime <x>`: White has `x` milliseconds left on the clock.
    pub w_time: Option<Duration>,

    /// `btime <x>`: Black has `x` milliseconds left on the clock.
    pub b_time: Option<Duration>,

    /// `winc <x>`: White increment per move in milliseconds.
    pub w_inc: Option<Duration>,

    /// `binc <x>`: Black increment per move in milliseconds.
    pub b_inc: Option<Duration>,

    /// `movestogo <x>`: there are `x` moves to the next time control.
    pub moves_to_go: Option<u64>,

    /// `depth <x>`: search `x` plies only.
    pub depth: Option<u32>,

    /// `movetime <x>`: search exactly `x` milliseconds.
    pub move_time: Option<Duration>,

    /// `infinite`: search until told to stop.
    pub infinite: bool,
}

/// Commands sent from a GUI to the engine over `stdin`.
///
/// Only the commands this engine acts on are represented; the protocol
/// requires unknown commands to be ignored, which the caller does on a
/// parse error.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum UciCommand {
    /// The `uci` handshake: identify and confirm with `uciok`.
    Uci,

    /// The `debug [on | off]` switch.
    Debug(bool),

    /// The `isready` probe, always answered with `readyok`.
    IsReady,

    /// The `setoption name <name> [value <value>]` command.
    SetOption { name: String, value: Option<String> },

    /// The `ucinewgame` reset between games.
    UciNewGame,

    /// The `position [startpos | fen <fen>] [moves ...]` command.
    /// `fen` is `None` for `startpos`.
    Position {
        fen: Option<String>,
        moves: Vec<String>,
    },

    /// The `go [...]` command, starting a search.
    Go(UciSearchOptions),

    /// The `stop` command, ending a running search early.
    Stop,

    /// The `quit` command.
    Quit,
}

impl UciCommand {
    /// Parse a line of input, returning a [`UciCommand`], if possible.
    ///
    /// If not possible, bails with a standard "unknown command" message.
    pub fn parse(input: &str) -> Result<Self> {
        let (first, rest) = input.split_once(' ').unwrap_or((input, ""));
        let rest = rest.trim();

        match first.trim() {
            "uci" => Ok(Self::Uci),
            "debug" => Self::parse_debug(rest),
            "isready" => Ok(Self::IsReady),
            "setoption" => Self::parse_setoption(rest),
            "ucinewgame" => Ok(Self::UciNewGame),
            "position" => Self::parse_position(rest),
            "go" => Self::parse_go(rest),
            "stop" => Ok(Self::Stop),
            "quit" => Ok(Self::Quit),
            _ => bail!("unknown command {input:?}"),
        }
    }

    /// Attempt to parse the arguments of [`UciCommand::Debug`].
    fn parse_debug(args: &str) -> Result<Self> {
        match args {
            "on" => Ok(Self::Debug(true)),
            "off" => Ok(Self::Debug(false)),
            _ => bail!("usage: debug [on | off]"),
        }
    }

    /// Attempt to parse the arguments of [`UciCommand::SetOption`].
    fn parse_setoption(args: &str) -> Result<Self> {
        let (_, rest) = args
            .split_once("name")
            .ok_or(anyhow!("usage: setoption name <name> [value <value>]"))?;

        let (name, value) = match rest.split_once("value") {
            Some((name, value)) => (name, Some(value.trim().to_string())),
            None => (rest, None),
        };

        let name = name.trim().to_string();
        if name.is_empty() {
            bail!("usage: setoption name <name> [value <value>]");
        }

        Ok(Self::SetOption { name, value })
    }

    /// Attempt to parse the arguments of [`UciCommand::Position`].
    fn parse_position(args: &str) -> Result<Self> {
        let (pos, moves) = match args.split_once("moves") {
            Some((pos, moves)) => (
                pos.trim(),
                moves.split_whitespace().map(String::from).collect(),
            ),
            None => (args, vec![]),
        };

        let fen = if let Some(fen) = pos.strip_prefix("fen") {
            Some(fen.trim().to_string())
        } else if pos.starts_with("startpos") {
            None
        } else {
            bail!("usage: position <fen <FEN> | startpos> [moves move_1 [move_2 ...]]");
        };

        Ok(Self::Position { fen, moves })
    }

    /// Attempt to parse the arguments of [`UciCommand::Go`].
    ///
    /// Tokens this engine does not support (`ponder`, `searchmoves`, ...) and
    /// anything unrecognized are skipped with a warning, per the protocol's
    /// be-lenient rule.
    fn parse_go(args: &str) -> Result<Self> {
        fn parse<T: FromStr>(arg: &str, input: Option<&str>) -> Result<T> {
            let input = input.ok_or(anyhow!("usage: go {arg} <x>"))?;
            input.parse().or(Err(anyhow!("invalid argument: {input}")))
        }
        fn parse_duration(arg: &str, input: Option<&str>) -> Result<Duration> {
            Ok(Duration::from_millis(parse(arg, input)?))
        }

        let mut opt = UciSearchOptions::default();

        let mut args = args.split_whitespace();
        while let Some(arg) = args.next() {
            match arg {
                "wtime" => opt.w_time = Some(parse_duration(arg, args.next())?),
                "btime" => opt.b_time = Some(parse_duration(arg, args.next())?),
                "winc" => opt.w_inc = Some(parse_duration(arg, args.next())?),
                "binc" => opt.b_inc = Some(parse_duration(arg, args.next())?),
                "movestogo" => opt.moves_to_go = Some(parse(arg, args.next())?),
                "depth" => opt.depth = Some(parse(arg, args.next())?),
                "movetime" => opt.move_time = Some(parse_duration(arg, args.next())?),
                "infinite" => opt.infinite = true,
                unknown => warn!("ignoring unsupported go option {unknown:?}"),
            }
        }

        Ok(Self::Go(opt))
    }
}

/// The score field of an `info` line: either centipawns or a mate distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UciScore {
    /// Centipawns from the engine's point of view.
    Cp(i32),

    /// Mate in this many *moves* (not plies); negative when being mated.
    Mate(i32),
}

impl fmt::Display for UciScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cp(cp) => write!(f, "cp {cp}"),
            Self::Mate(moves) => write!(f, "mate {moves}"),
        }
    }
}

/// The fields of an `info` line this engine reports, in emission order:
/// `depth`, `score`, `time`, `nodes`, `nps`, `pv`.
#[derive(Debug, Clone, Default)]
pub struct UciInfo {
    pub depth: Option<u32>,
    pub score: Option<UciScore>,
    /// Time searched, in milliseconds.
    pub time: Option<u128>,
    pub nodes: Option<u64>,
    pub nps: Option<u64>,
    /// The best line found.
    pub pv: Vec<String>,
    /// Free-text diagnostics, shown by GUIs in debug mode.
    pub string: Option<String>,
}

impl UciInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(mut self, depth: u32) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn score(mut self, score: UciScore) -> Self {
        self.score = Some(score);
        self
    }

    pub fn time(mut self, time: u128) -> Self {
        self.time = Some(time);
        self
    }

    pub fn nodes(mut self, nodes: u64) -> Self {
        self.nodes = Some(nodes);
        self
    }

    pub fn nps(mut self, nps: u64) -> Self {
        self.nps = Some(nps);
        self
    }

    pub fn pv<T: fmt::Display>(mut self, pv: impl IntoIterator<Item = T>) -> Self {
        self.pv = pv.into_iter().map(|mv| mv.to_string()).collect();
        self
    }

    pub fn string(mut self, string: impl fmt::Display) -> Self {
        self.string = Some(string.to_string());
        self
    }
}

impl fmt::Display for UciInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(6);
        if let Some(depth) = self.depth {
            parts.push(format!("depth {depth}"));
        }
        if let Some(score) = self.score {
            parts.push(format!("score {score}"));
        }
        if let Some(time) = self.time {
            parts.push(format!("time {time}"));
        }
        if let Some(nodes) = self.nodes {
            parts.push(format!("nodes {nodes}"));
        }
        if let Some(nps) = self.nps {
            parts.push(format!("nps {nps}"));
        }
        if !self.pv.is_empty() {
            parts.push(format!("pv {}", self.pv.join(" ")));
        }
        if let Some(string) = &self.string {
            parts.push(format!("string {string}"));
        }
        write!(f, "{}", parts.join(" "))
    }
}

/// Responses sent from the engine to the GUI via `stdout`.
#[derive(Debug, Clone)]
pub enum UciResponse {
    /// `id name <x>` and `id author <x>`.
    Id { name: String, author: String },

    /// `uciok`.
    UciOk,

    /// `readyok`.
    ReadyOk,

    /// `bestmove <move>`. A null best move is sent as `0000`.
    BestMove(String),

    /// `info [...]`.
    Info(UciInfo),
}

impl fmt::Display for UciResponse {
    /// Responses are formatted according to the UCI specification.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id { name, author } => write!(f, "id name {name}\nid author {author}"),
            Self::UciOk => write!(f, "uciok"),
            Self::ReadyOk => write!(f, "readyok"),
            Self::BestMove(mv) => write!(f, "bestmove {mv}"),
            Self::Info(info) => write!(f, "info {info}"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_debug() {
        assert_eq!(UciCommand::parse("debug on").unwrap(), UciCommand::Debug(true));
        assert_eq!(
            UciCommand::parse("debug off").unwrap(),
            UciCommand::Debug(false)
        );
        assert!(UciCommand::parse("debug maybe").is_err());
    }

    #[test]
    fn parse_position() {
        assert_eq!(
            UciCommand::parse("position startpos").unwrap(),
            UciCommand::Position {
                fen: None,
                moves: vec![]
            }
        );

        assert_eq!(
            UciCommand::parse("position startpos moves e2e4 e7e5").unwrap(),
            UciCommand::Position {
                fen: None,
                moves: vec!["e2e4".into(), "e7e5".into()]
            }
        );

        assert_eq!(
            UciCommand::parse("position fen 8/8/8/8/8/8/8/K6k w - - 0 1 moves a1a2").unwrap(),
            UciCommand::Position {
                fen: Some("8/8/8/8/8/8/8/K6k w - - 0 1".into()),
                moves: vec!["a1a2".into()]
            }
        );

        assert!(UciCommand::parse("position nonsense").is_err());
    }

    #[test]
    fn parse_go() {
        let UciCommand::Go(opt) =
            UciCommand::parse("go wtime 300000 btime 300000 winc 2000 binc 2000 movestogo 40")
                .unwrap()
        else {
            panic!("expected go");
        };
        assert_eq!(opt.w_time, Some(Duration::from_millis(300_000)));
        assert_eq!(opt.b_inc, Some(Duration::from_millis(2_000)));
        assert_eq!(opt.moves_to_go, Some(40));
        assert_eq!(opt.depth, None);
        assert!(!opt.infinite);

        let UciCommand::Go(opt) = UciCommand::parse("go movetime 100").unwrap() else {
            panic!("expected go");
        };
        assert_eq!(opt.move_time, Some(Duration::from_millis(100)));

        let UciCommand::Go(opt) = UciCommand::parse("go depth 6").unwrap() else {
            panic!("expected go");
        };
        assert_eq!(opt.depth, Some(6));

        // Unsupported and unknown tokens are skipped, not errors.
        let UciCommand::Go(opt) = UciCommand::parse("go ponder infinite frobnicate").unwrap()
        else {
            panic!("expected go");
        };
        assert!(opt.infinite);
    }

    #[test]
    fn parse_setoption() {
        assert_eq!(
            UciCommand::parse("setoption name Hash value 64").unwrap(),
            UciCommand::SetOption {
                name: "Hash".into(),
                value: Some("64".into())
            }
        );
        assert_eq!(
            UciCommand::parse("setoption name Clear Hash").unwrap(),
            UciCommand::SetOption {
                name: "Clear Hash".into(),
                value: None
            }
        );
        assert!(UciCommand::parse("setoption frobnicate").is_err());
    }

    #[test]
    fn parse_unknown_command() {
        assert!(UciCommand::parse("xyzzy").is_err());
        assert!(UciCommand::parse("").is_err());
    }

    #[test]
    fn display_info_line() {
        let info = UciInfo::new()
            .depth(7)
            .score(UciScore::Cp(13))
            .time(42)
            .nodes(1_000)
            .nps(23_809)
            .pv(["e2e4", "e7e5"]);
        assert_eq!(
            UciResponse::Info(info).to_string(),
            "info depth 7 score cp 13 time 42 nodes 1000 nps 23809 pv e2e4 e7e5"
        );
    }

    #[test]
    fn display_mate_score() {
        assert_eq!(UciScore::Mate(2).to_string(), "mate 2");
        assert_eq!(UciScore::Mate(-3).to_string(), "mate -3");
    }

    #[test]
    fn display_bestmove() {
        assert_eq!(
            UciResponse::BestMove("e2e4".into()).to_string(),
            "bestmove e2e4"
        );
    }
}
