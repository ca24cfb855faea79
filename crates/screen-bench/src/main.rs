use std::io;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;
use widget_screen::{
    Container, HeadlessBackend, NodeId, Point, RawEvent, Rect, Screen, ScreenConfig, Size,
    WindowStack,
};

const SCREEN_SIZE: Size = Size::new(1920, 1080);
const WINDOW_SIZE: Size = Size::new(160, 120);

#[derive(Parser, Debug)]
#[command(
    name = "screen-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Headless benchmark for window raising and pointer dispatch"
)]
struct BenchCli {
    /// Number of top-level windows on the stack.
    #[arg(short = 'w', long = "windows", value_name = "COUNT", default_value_t = 64)]
    windows: usize,

    /// Number of popups, each owned by one of the first windows.
    #[arg(short = 'p', long = "popups", value_name = "COUNT", default_value_t = 8)]
    popups: usize,

    /// Operations per phase.
    #[arg(
        short = 'i',
        long = "iterations",
        value_name = "COUNT",
        default_value_t = 20_000
    )]
    iterations: u64,
}

struct BenchConfig {
    windows: usize,
    popups: usize,
    iterations: u64,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if !(1..=4096).contains(&cli.windows) {
            return Err("windows must be between 1 and 4096".to_string());
        }
        if cli.popups > cli.windows {
            return Err("popups must not outnumber windows".to_string());
        }
        if !(1..=10_000_000).contains(&cli.iterations) {
            return Err("iterations must be between 1 and 10000000".to_string());
        }
        Ok(Self {
            windows: cli.windows,
            popups: cli.popups,
            iterations: cli.iterations,
        })
    }
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    let screen_config =
        ScreenConfig::new(SCREEN_SIZE, "screen-bench").with_pointer_correction(Point::ZERO);
    let mut screen: Screen<HeadlessBackend> =
        Screen::new(screen_config).map_err(io::Error::other)?;
    let windows = populate(&mut screen, &config);

    let mut rng = XorShift::seeded_from_clock();
    let raise = bench_raise(&mut screen, &windows, &config, &mut rng);
    let motion = bench_motion(&mut screen, &config, &mut rng);
    let stacked = WindowStack::new(screen.tree_mut()).popups_above_owners();

    println!("{}", report(&config, &raise, &motion, stacked));
    Ok(())
}

fn populate(screen: &mut Screen<HeadlessBackend>, config: &BenchConfig) -> Vec<NodeId> {
    let columns = (SCREEN_SIZE.width / WINDOW_SIZE.width).max(1) as usize;
    let mut windows = Vec::with_capacity(config.windows);
    for i in 0..config.windows {
        let col = (i % columns) as i32;
        let row = (i / columns) as i32;
        let rect = Rect::new(
            (col * WINDOW_SIZE.width / 2) % SCREEN_SIZE.width,
            (row * WINDOW_SIZE.height / 2) % SCREEN_SIZE.height,
            WINDOW_SIZE.width,
            WINDOW_SIZE.height,
        );
        windows.push(screen.tree_mut().add_window(rect, false, Container));
    }
    for owner in windows.iter().take(config.popups) {
        let rect = Rect::from_parts(screen.tree().position(*owner), Size::new(40, 30));
        screen.tree_mut().add_popup(*owner, rect, Container);
    }
    windows
}

struct Phase {
    ops: u64,
    elapsed: Duration,
}

impl Phase {
    fn per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.ops as f64 / secs
        } else {
            0.0
        }
    }

    fn micros_per_op(&self) -> f64 {
        if self.ops == 0 {
            return 0.0;
        }
        self.elapsed.as_secs_f64() * 1_000_000.0 / self.ops as f64
    }
}

fn bench_raise(
    screen: &mut Screen<HeadlessBackend>,
    windows: &[NodeId],
    config: &BenchConfig,
    rng: &mut XorShift,
) -> Phase {
    let start = Instant::now();
    for _ in 0..config.iterations {
        let pick = windows[rng.below(windows.len() as u64) as usize];
        screen.move_to_front(pick);
    }
    Phase {
        ops: config.iterations,
        elapsed: start.elapsed(),
    }
}

fn bench_motion(
    screen: &mut Screen<HeadlessBackend>,
    config: &BenchConfig,
    rng: &mut XorShift,
) -> Phase {
    let start = Instant::now();
    for _ in 0..config.iterations {
        let x = rng.below(SCREEN_SIZE.width as u64) as f64;
        let y = rng.below(SCREEN_SIZE.height as u64) as f64;
        screen.process_event(RawEvent::PointerMove { x, y });
    }
    Phase {
        ops: config.iterations,
        elapsed: start.elapsed(),
    }
}

fn report(config: &BenchConfig, raise: &Phase, motion: &Phase, stacked: bool) -> String {
    indoc::formatdoc!(
        r#"
        Screen bench: {windows} windows, {popups} popups, {iterations} ops per phase.
        move_to_front: {raise_ops:.0}/s ({raise_us:.2} us/op)
        pointer move:  {motion_ops:.0}/s ({motion_us:.2} us/op)
        popups above owners: {stacked}
        "#,
        windows = config.windows,
        popups = config.popups,
        iterations = config.iterations,
        raise_ops = raise.per_second(),
        raise_us = raise.micros_per_op(),
        motion_ops = motion.per_second(),
        motion_us = motion.micros_per_op(),
        stacked = if stacked { "yes" } else { "NO" },
    )
}

struct XorShift {
    state: u64,
}

impl XorShift {
    fn seeded_from_clock() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
            ^ 0xA5A5_A5A5_1234_5678;
        Self { state: seed | 1 }
    }

    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound.max(1)
    }
}
