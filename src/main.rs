use anyhow::{bail, Context};
use ptable::logging::{self, LogLevel, Logger};
use ptable::{file, PieceTable, PieceTableConfig};
use std::path::PathBuf;

const USAGE: &str = "usage: ptable [--write] <FILE> [i:POS:TEXT | d:POS:LEN]...";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Edit {
    Insert { pos: usize, text: String },
    Delete { pos: usize, len: usize },
}

impl Edit {
    fn parse(arg: &str) -> anyhow::Result<Self> {
        let mut parts = arg.splitn(3, ':');
        let kind = parts.next().unwrap_or_default();
        let pos = parts
            .next()
            .with_context(|| format!("missing position in edit `{}`", arg))?
            .parse::<usize>()
            .with_context(|| format!("invalid position in edit `{}`", arg))?;
        let payload = parts
            .next()
            .with_context(|| format!("missing payload in edit `{}`", arg))?;

        match kind {
            "i" => Ok(Edit::Insert {
                pos,
                text: payload.replace("\\n", "\n"),
            }),
            "d" => Ok(Edit::Delete {
                pos,
                len: payload
                    .parse()
                    .with_context(|| format!("invalid length in edit `{}`", arg))?,
            }),
            _ => bail!("unknown edit kind `{}` (expected `i` or `d`)", kind),
        }
    }

    fn apply(&self, table: &mut PieceTable) -> ptable::error::buffer::Result<()> {
        match self {
            Edit::Insert { pos, text } => table.insert(*pos, text),
            Edit::Delete { pos, len } => table.delete(*pos, *len),
        }
    }
}

fn demo() -> anyhow::Result<()> {
    let mut table = PieceTable::create("Hello world");
    table.insert(11, "!")?;
    table.insert(0, "- ")?;
    table.insert(9, ".")?;
    print!("{}", table.dump());

    table.delete(0, 2)?;
    print!("{}", table.dump());
    table.release();
    Ok(())
}

fn run(args: Vec<String>) -> anyhow::Result<()> {
    let write_back = args.iter().any(|arg| arg == "--write");
    let mut positional = args.into_iter().filter(|arg| arg != "--write");

    let Some(path) = positional.next().map(PathBuf::from) else {
        return demo();
    };
    let edits = positional
        .map(|arg| Edit::parse(&arg))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let config = PieceTableConfig::load().context("failed to load configuration")?;
    let expanded = file::expand_path(&path)
        .with_context(|| format!("invalid path {}", path.display()))?;
    let mut table = if expanded.exists() {
        file::load_with_config(&expanded, &config)
            .with_context(|| format!("failed to open {}", expanded.display()))?
    } else {
        PieceTable::with_config("", &config)
    };

    for edit in &edits {
        edit.apply(&mut table)
            .with_context(|| format!("failed to apply {:?}", edit))?;
    }

    print!("{}", table.dump());

    if write_back {
        file::save(&expanded, &table)
            .with_context(|| format!("failed to save {}", expanded.display()))?;
    }
    table.release();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        println!("{}", USAGE);
        return Ok(());
    }

    let _ = logging::init(Logger::new(LogLevel::from_env()));
    run(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_edits() {
        assert_eq!(
            Edit::parse("i:3:a:b").unwrap(),
            Edit::Insert {
                pos: 3,
                text: "a:b".to_string()
            }
        );
        assert_eq!(
            Edit::parse("d:0:2").unwrap(),
            Edit::Delete { pos: 0, len: 2 }
        );
        assert!(Edit::parse("x:0:2").is_err());
        assert!(Edit::parse("d:zero:2").is_err());
        assert!(Edit::parse("i:1").is_err());
    }

    #[test]
    fn test_apply_edits() {
        let mut table = PieceTable::create("abc");
        Edit::parse("i:3:\\n").unwrap().apply(&mut table).unwrap();
        Edit::parse("d:0:1").unwrap().apply(&mut table).unwrap();
        assert_eq!(table.serialize(), "bc\n");
    }
}
