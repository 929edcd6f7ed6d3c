use std::{cell::RefCell, fs, path::PathBuf, rc::Rc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use veilmorph::{HeadlessDom, MorphEngine, MorphOptions, StepScheduler};

#[derive(Parser, Debug)]
#[command(name = "veilmorph", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one transition against the headless backend and print every
    /// path write, frame by frame.
    Preview(PreviewArgs),
    /// Print the computed total duration in milliseconds.
    Duration(DurationArgs),
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Options JSON; built-in defaults apply when omitted.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Number of curtain paths in the synthetic document.
    #[arg(long, default_value_t = 3)]
    paths: usize,

    /// Frames per second of the fixed-step clock.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Play the closing transition instead of the opening one.
    #[arg(long)]
    leave: bool,
}

#[derive(Parser, Debug)]
struct DurationArgs {
    /// Options JSON; built-in defaults apply when omitted.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Number of curtain paths in the synthetic document.
    #[arg(long, default_value_t = 3)]
    paths: usize,
}

fn load_options(in_path: Option<&PathBuf>) -> anyhow::Result<MorphOptions> {
    let options = match in_path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading options from {}", path.display()))?;
            MorphOptions::from_json_str(&text)?
        }
        None => MorphOptions::default(),
    };
    options.validate()?;
    Ok(options)
}

fn preview(args: PreviewArgs) -> anyhow::Result<()> {
    let mut options = load_options(args.in_path.as_ref())?;
    if args.leave {
        // Start opened so the closing transition has something to close.
        options.is_opened = true;
    }

    let dom = Rc::new(RefCell::new(
        HeadlessDom::builder()
            .svg_selector(options.svg_el.as_str())
            .path_selector(options.path_el.as_str())
            .paths(args.paths)
            .build(),
    ));
    let sched = Rc::new(RefCell::new(StepScheduler::new(args.fps)));
    let mut engine = MorphEngine::new(options, Rc::clone(&dom), Rc::clone(&sched));

    engine.init();
    if engine.total_duration() == 0 {
        anyhow::bail!("engine failed to initialize (no paths?)");
    }
    let cfg = engine.config();
    println!(
        "resolved: {} points, ease {}, snap step {} tenths",
        cfg.points_count,
        serde_json::to_string(&cfg.ease)?,
        cfg.snap_step10
    );

    let mut last_printed: Vec<Option<String>> = vec![None; args.paths];
    let mut dump = |frame: usize, last: &mut Vec<Option<String>>| {
        let dom = dom.borrow();
        for (i, slot) in last.iter_mut().enumerate() {
            let d = dom.path_attr(i, "d");
            if d != *slot {
                if let Some(d) = &d {
                    println!("frame {frame:>4}  path {i}  d=\"{d}\"");
                }
                *slot = d;
            }
        }
    };
    dump(0, &mut last_printed);

    let mut done = if args.leave {
        engine.leave()
    } else {
        engine.entry()
    };

    let mut frame = 0usize;
    loop {
        let active = sched.borrow_mut().tick();
        frame += 1;
        dump(frame, &mut last_printed);
        if !active {
            break;
        }
    }

    anyhow::ensure!(done.try_resolved(), "transition did not complete");
    println!(
        "completed in {frame} frames ({} ms configured)",
        engine.total_duration()
    );
    Ok(())
}

fn duration(args: DurationArgs) -> anyhow::Result<()> {
    let options = load_options(args.in_path.as_ref())?;
    let dom = Rc::new(RefCell::new(
        HeadlessDom::builder()
            .svg_selector(options.svg_el.as_str())
            .path_selector(options.path_el.as_str())
            .paths(args.paths)
            .build(),
    ));
    let sched = Rc::new(RefCell::new(StepScheduler::new(60.0)));
    let mut engine = MorphEngine::new(options, dom, sched);
    engine.init();
    println!("{}", engine.total_duration());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Preview(args) => preview(args),
        Command::Duration(args) => duration(args),
    }
}
