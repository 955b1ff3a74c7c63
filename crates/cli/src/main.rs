//! # CLI - Roll-Call Interactive Shell
//!
//! A REPL-style front end for the roster store and the selection engine.
//! Reads commands from stdin, runs them against the store under the current
//! session, and prints results to stdout. Works both interactively and with
//! piped input.
//!
//! ## Commands
//!
//! ```text
//! CLASS ADD name | CLASS LIST | CLASS RENAME old new | CLASS DEL name
//! USE class                  Select the current class
//! GROUP ADD name | GROUP LIST | GROUP RENAME old new | GROUP DEL name
//! GROUP SCORE name score     Set a group's score directly
//! MEMBERS group              List a group's member roster
//! STUDENT ADD id name group | STUDENT LIST | STUDENT DEL id
//! PHOTO id [path]            Show (or set) a student's photo path
//! SPIN GROUPS|STUDENTS|MEMBERS
//!                            Start spinning; candidates print as "~ name"
//! STOP                       Settle the spin
//! SCORE score                Score the settled group
//! RECORD absent|leave|answered
//!                            Record a status for the settled student
//! STATUS LIST                List status events of the current class
//! STATS | HELP | EXIT | QUIT
//! ```
//!
//! ## Configuration
//!
//! ```text
//! ROLLCALL_ROOT     class root directory        (default: "data/classes")
//! ROLLCALL_TICK_MS  spin tick interval, ms      (default: 50)
//! ROLLCALL_LOG      tracing filter, to stderr   (default: "warn")
//! ```
//!
//! ## Example
//!
//! ```text
//! $ cargo run -p cli
//! roll-call started (root=data/classes, tick=50ms)
//! > CLASS ADD C1
//! OK
//! > USE C1
//! OK
//! > GROUP ADD G1
//! OK
//! > SPIN GROUPS
//! ~ G1
//! > STOP
//! SELECTED group G1
//! > EXIT
//! bye
//! ```

mod session;

use anyhow::{anyhow, bail, Result};
use config::RosterConfig;
use session::{Session, SpinTarget};
use std::io::{self, BufRead, Write};
use store::{RosterStore, Status};
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
Commands: CLASS ADD|LIST|RENAME|DEL | USE class
          GROUP ADD|LIST|RENAME|DEL|SCORE | MEMBERS group
          STUDENT ADD id name group | STUDENT LIST | STUDENT DEL id | PHOTO id [path]
          SPIN GROUPS|STUDENTS|MEMBERS | STOP | SCORE score | RECORD status
          STATUS LIST | STATS | HELP | EXIT";

/// What the loop does after a command.
enum Flow {
    Continue,
    Exit,
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cfg = RosterConfig::from_env();
    init_tracing(&cfg.log_filter);

    let store = RosterStore::open(&cfg.root)?;
    let session = Session::new(store, cfg.tick_interval);
    session.on_tick(|candidate| println!("~ {}", candidate));
    run(session, &cfg)
}

fn run(mut session: Session, cfg: &RosterConfig) -> Result<()> {
    println!(
        "roll-call started (root={}, tick={}ms)",
        cfg.root.display(),
        cfg.tick_interval.as_millis()
    );
    println!("{}", HELP);
    prompt();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        match execute(&mut session, &line) {
            Ok(Flow::Exit) => {
                println!("bye");
                break;
            }
            Ok(Flow::Continue) => {}
            Err(e) => println!("ERR {:#}", e),
        }
        prompt();
    }
    Ok(())
}

fn prompt() {
    print!("> ");
    io::stdout().flush().ok();
}

fn execute(session: &mut Session, line: &str) -> Result<Flow> {
    let mut parts = line.split_whitespace();
    let Some(cmd) = parts.next() else {
        return Ok(Flow::Continue);
    };
    let args: Vec<&str> = parts.collect();

    match cmd.to_uppercase().as_str() {
        "CLASS" => class_command(session, &args)?,
        "USE" => {
            let [name] = args[..] else {
                bail!("usage: USE class");
            };
            session.use_class(name)?;
            println!("OK");
        }
        "GROUP" => group_command(session, &args)?,
        "MEMBERS" => {
            let [group] = args[..] else {
                bail!("usage: MEMBERS group");
            };
            let class = session.require_class()?;
            let members = session.store().index().list_group_members(class, group)?;
            for m in &members {
                println!("{}", m);
            }
            println!("({} members)", members.len());
        }
        "STUDENT" => student_command(session, &args)?,
        "PHOTO" => {
            let class = session.require_class()?;
            match args[..] {
                [id] => {
                    let path = session.store().index().photo_path(class, id)?;
                    println!("{}", path.display());
                }
                [id, path] => {
                    session.store().set_student_photo(class, id, path)?;
                    println!("OK");
                }
                _ => bail!("usage: PHOTO id [path]"),
            }
        }
        "SPIN" => {
            let target = match args.first().map(|a| a.to_uppercase()).as_deref() {
                Some("GROUPS") => SpinTarget::Groups,
                Some("STUDENTS") => SpinTarget::Students,
                Some("MEMBERS") => SpinTarget::Members,
                _ => bail!("usage: SPIN GROUPS|STUDENTS|MEMBERS"),
            };
            session.spin(target)?;
        }
        "STOP" => {
            let settled = session.stop()?;
            println!("SELECTED {}", settled);
        }
        "SCORE" => {
            if args.is_empty() {
                bail!("usage: SCORE score");
            }
            let group = session.score(&args.join(" "))?;
            println!("OK ({} = {})", group.name, group.score.unwrap_or_default());
        }
        "RECORD" => {
            let [status] = args[..] else {
                bail!("usage: RECORD {}", status_words());
            };
            let event = session.record(status)?;
            println!("OK ({} {})", event.subject, event.status);
        }
        "STATUS" => match args.first().map(|a| a.to_uppercase()).as_deref() {
            Some("LIST") => {
                let class = session.require_class()?;
                let events = session.store().index().list_status_events(class)?;
                if events.is_empty() {
                    println!("(empty)");
                }
                for ev in &events {
                    println!(
                        "{} {} {}",
                        ev.time.as_deref().unwrap_or("-"),
                        ev.subject,
                        ev.status
                    );
                }
            }
            _ => bail!("usage: STATUS LIST"),
        },
        "STATS" => print_stats(session)?,
        "HELP" => println!("{}", HELP),
        "EXIT" | "QUIT" => return Ok(Flow::Exit),
        other => bail!("unknown command: {}", other),
    }
    Ok(Flow::Continue)
}

fn class_command(session: &mut Session, args: &[&str]) -> Result<()> {
    let store = session.store().clone();
    match (sub(args)?.as_str(), &args[1..]) {
        ("ADD", [name]) => store.create_class(name)?,
        ("LIST", []) => {
            let classes = store.list_classes()?;
            for c in &classes {
                let count = store.index().student_count(c)?;
                println!("{} ({} students)", c, count);
            }
            println!("({} classes)", classes.len());
            return Ok(());
        }
        ("RENAME", [old, new]) => {
            store.rename_class(old, new)?;
            session.forget_class(old);
        }
        ("DEL", [name]) => {
            store.delete_class(name)?;
            session.forget_class(name);
        }
        _ => bail!("usage: CLASS ADD name | CLASS LIST | CLASS RENAME old new | CLASS DEL name"),
    }
    println!("OK");
    Ok(())
}

fn group_command(session: &Session, args: &[&str]) -> Result<()> {
    let class = session.require_class()?.to_string();
    let store = session.store();
    match (sub(args)?.as_str(), &args[1..]) {
        ("ADD", [name]) => {
            store.create_group(&class, name)?;
        }
        ("LIST", []) => {
            let groups = store.index().list_groups(&class)?;
            for g in &groups {
                println!("{} score={}", g.name, g.score.as_deref().unwrap_or("0"));
            }
            println!("({} groups)", groups.len());
            return Ok(());
        }
        ("RENAME", [old, new]) => store.rename_group(&class, old, new)?,
        ("DEL", [name]) => store.delete_group(&class, name)?,
        ("SCORE", [name, score @ ..]) if !score.is_empty() => {
            store.ledger().update_score(&class, name, &score.join(" "))?;
        }
        _ => bail!("usage: GROUP ADD|LIST|RENAME|DEL|SCORE ..."),
    }
    println!("OK");
    Ok(())
}

fn student_command(session: &Session, args: &[&str]) -> Result<()> {
    let class = session.require_class()?.to_string();
    let store = session.store();
    match (sub(args)?.as_str(), &args[1..]) {
        ("ADD", [id, name, group]) => {
            store.create_student(&class, id, name, group)?;
        }
        ("LIST", []) => {
            let students = store.index().list_students(&class)?;
            for s in &students {
                println!("{} {} {}", s.id, s.name, s.group.as_deref().unwrap_or("-"));
            }
            println!("({} students)", students.len());
            return Ok(());
        }
        ("DEL", [id]) => store.delete_student(&class, id)?,
        _ => bail!("usage: STUDENT ADD id name group | STUDENT LIST | STUDENT DEL id"),
    }
    println!("OK");
    Ok(())
}

fn print_stats(session: &Session) -> Result<()> {
    let store = session.store();
    println!("root: {}", store.root().display());
    println!("classes: {}", store.list_classes()?.len());
    if let Some(class) = session.class() {
        let index = store.index();
        println!(
            "class: {} (groups={}, students={}, events={})",
            class,
            index.list_groups(class)?.len(),
            index.student_count(class)?,
            index.list_status_events(class)?.len()
        );
    }
    println!("{:?}", session);
    Ok(())
}

/// Upper-cased subcommand.
fn sub(args: &[&str]) -> Result<String> {
    args.first()
        .map(|s| s.to_uppercase())
        .ok_or_else(|| anyhow!("missing subcommand"))
}

/// `absent|leave|answered`
fn status_words() -> String {
    Status::ALL.map(Status::as_str).join("|")
}
