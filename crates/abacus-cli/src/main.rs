mod chart;
mod session;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use abacus_core::dates::{days_in_month, is_leap_year};
use abacus_core::time::{millis_to_timestamp_string, now_unix_millis};
use abacus_core::{
    CURRENCIES, CalendarDate, Category, CustomTheme, DateDifference, ERROR_DISPLAY, Mode,
    RateFeed, RateTable, ThemeColors, Viewport, add_days, evaluate_expression, find_unit,
    format_number, history_to_csv, history_to_html, mock_fetch, parse_operand, plot,
    solve_linear, subtract_days,
};
use abacus_core::theme::builtin_themes;
use abacus_store::profile::list_profiles;
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};

use crate::session::{Session, parse_pad};

#[derive(Parser)]
#[command(name = "abacus", about = "Calculator with history, memory, converters and plots")]
struct Cli {
    /// Profile to use (defaults to the configured profile, then "default")
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Feed keypad input, e.g. `press 2 + 3 x 4 =` or `press 16 sqrt`
    Press {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        keys: Vec<String>,
    },

    /// Interactive keypad; one line of keys per prompt
    Repl,

    /// Evaluate an expression with precedence and functions
    Eval {
        #[arg(allow_hyphen_values = true)]
        expression: String,
    },

    /// Show or clear the calculation history
    History {
        #[arg(long)]
        clear: bool,

        /// Show at most this many entries
        #[arg(long)]
        limit: Option<usize>,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export history as CSV or printable HTML
    Export {
        format: ExportFormat,
        path: PathBuf,
    },

    /// Memory register
    Memory {
        #[command(subcommand)]
        action: MemoryAction,
    },

    /// Convert between units
    #[command(allow_negative_numbers = true)]
    Convert {
        value: f64,
        from: String,
        to: String,

        #[arg(long)]
        category: Option<String>,
    },

    /// List unit categories, or the units of one category
    Units { category: Option<String> },

    /// Convert between currencies
    #[command(allow_negative_numbers = true)]
    Currency {
        amount: f64,
        from: String,
        to: String,

        /// Fetch fresh (simulated) rates first
        #[arg(long)]
        live: bool,
    },

    /// List supported currencies and their USD rates
    Currencies,

    /// Date arithmetic
    Date {
        #[command(subcommand)]
        action: DateAction,
    },

    /// Solve a linear equation such as "2x + 3 = 11"
    Solve {
        #[arg(allow_hyphen_values = true)]
        equation: String,

        #[arg(long, default_value = "x")]
        var: String,
    },

    /// Plot a function of x as an ASCII chart
    #[command(allow_negative_numbers = true)]
    Plot {
        #[arg(allow_hyphen_values = true)]
        expression: String,

        #[arg(long, default_value_t = -10.0)]
        x_min: f64,
        #[arg(long, default_value_t = 10.0)]
        x_max: f64,
        #[arg(long, default_value_t = -10.0)]
        y_min: f64,
        #[arg(long, default_value_t = 10.0)]
        y_max: f64,
    },

    /// Show, switch, toggle or define themes
    Theme {
        name: Option<String>,

        #[arg(long)]
        toggle: bool,

        #[arg(long)]
        list: bool,

        /// Define a custom theme with this name (requires --colors)
        #[arg(long, requires = "colors")]
        define: Option<String>,

        /// primary,secondary,accent,background,surface,text as #RRGGBB
        #[arg(long, value_delimiter = ',')]
        colors: Option<Vec<String>>,

        /// Mark the defined theme as dark
        #[arg(long)]
        dark: bool,

        /// Delete a custom theme by id
        #[arg(long)]
        delete: Option<String>,
    },

    /// Show or switch the calculator mode
    Mode {
        mode: Option<String>,

        /// Toggle the scientific panel
        #[arg(long)]
        scientific: bool,
    },

    /// Export or import the persisted calculator state as JSON
    State {
        #[command(subcommand)]
        action: StateAction,
    },

    /// List profiles under the data directory
    Profiles,

    /// Show profile statistics
    Stats,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Html,
}

#[derive(Subcommand)]
enum MemoryAction {
    Show,
    Clear,
    #[command(allow_negative_numbers = true)]
    Store { value: String },
    #[command(allow_negative_numbers = true)]
    Add { value: String },
    #[command(allow_negative_numbers = true)]
    Sub { value: String },
    Recall,
}

#[derive(Subcommand)]
enum DateAction {
    /// Difference between two ISO dates
    Diff { from: String, to: String },
    #[command(allow_negative_numbers = true)]
    Add { date: String, days: i64 },
    #[command(allow_negative_numbers = true)]
    Sub { date: String, days: i64 },
    /// Weekday, long form and calendar facts for a date
    Info { date: String },
}

#[derive(Subcommand)]
enum StateAction {
    Export { path: PathBuf },
    Import { path: PathBuf },
}

fn data_dir() -> PathBuf {
    std::env::var("ABACUS_DATA_DIR")
        .ok()
        .map(PathBuf::from)
        .unwrap_or_else(abacus_store::default_base_dir)
}

fn open_session(cli: &Cli) -> Result<Session> {
    Session::open(cli.profile.as_deref(), &data_dir())
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Press { keys } => cmd_press(&cli, &keys.join(" ")),
        Commands::Repl => cmd_repl(&cli),
        Commands::Eval { expression } => cmd_eval(&cli, expression),
        Commands::History { clear, limit, json } => cmd_history(&cli, *clear, *limit, *json),
        Commands::Export { format, path } => cmd_export(&cli, *format, path),
        Commands::Memory { action } => cmd_memory(&cli, action),
        Commands::Convert {
            value,
            from,
            to,
            category,
        } => cmd_convert(*value, from, to, category.as_deref()),
        Commands::Units { category } => cmd_units(category.as_deref()),
        Commands::Currency {
            amount,
            from,
            to,
            live,
        } => cmd_currency(*amount, from, to, *live),
        Commands::Currencies => cmd_currencies(),
        Commands::Date { action } => cmd_date(action),
        Commands::Solve { equation, var } => cmd_solve(equation, var),
        Commands::Plot {
            expression,
            x_min,
            x_max,
            y_min,
            y_max,
        } => cmd_plot(&cli, expression, (*x_min, *x_max), (*y_min, *y_max)),
        Commands::Theme {
            name,
            toggle,
            list,
            define,
            colors,
            dark,
            delete,
        } => cmd_theme(
            &cli,
            ThemeArgs {
                name: name.as_deref(),
                toggle: *toggle,
                list: *list,
                define: define.as_deref(),
                colors: colors.as_deref(),
                dark: *dark,
                delete: delete.as_deref(),
            },
        ),
        Commands::Mode { mode, scientific } => cmd_mode(&cli, mode.as_deref(), *scientific),
        Commands::State { action } => cmd_state(&cli, action),
        Commands::Profiles => cmd_profiles(),
        Commands::Stats => cmd_stats(&cli),
    }
}

// ---------------------------------------------------------------------------
// Keypad
// ---------------------------------------------------------------------------

fn cmd_press(cli: &Cli, keys: &str) -> Result<()> {
    let mut session = open_session(cli)?;
    for input in parse_pad(keys)? {
        session.press(input);
    }
    session.settle();

    let calc = session.calc();
    if let Some(pending) = calc.pending_expression() {
        tracing::debug!("pending: {pending}");
    }
    println!("{}", calc.clipboard_text());
    Ok(())
}

fn cmd_repl(cli: &Cli) -> Result<()> {
    let mut session = open_session(cli)?;
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    for line in stdin.lock().lines() {
        let line = line.context("failed to read input")?;
        let line = line.trim();
        match line {
            "" => continue,
            "quit" | "exit" => break,
            _ => {}
        }

        match parse_pad(line) {
            Ok(inputs) => {
                for input in inputs {
                    session.press(input);
                }
                session.settle();
                let calc = session.calc();
                match calc.pending_expression() {
                    Some(pending) if calc.is_waiting_for_value() => {
                        writeln!(stdout, "{pending}  {}", calc.display())?
                    }
                    _ => writeln!(stdout, "{}", calc.display())?,
                }
            }
            Err(e) => writeln!(stdout, "error: {e:#}")?,
        }
        stdout.flush()?;
    }
    Ok(())
}

fn cmd_eval(cli: &Cli, expression: &str) -> Result<()> {
    let value = evaluate_expression(expression)
        .with_context(|| format!("cannot evaluate '{expression}'"))?;
    let result = format_number(value);

    let mut session = open_session(cli)?;
    session.calc_mut().record_history(expression, &result);
    session.settle();

    println!("{result}");
    Ok(())
}

// ---------------------------------------------------------------------------
// History and memory
// ---------------------------------------------------------------------------

fn cmd_history(cli: &Cli, clear: bool, limit: Option<usize>, json: bool) -> Result<()> {
    let mut session = open_session(cli)?;
    if clear {
        session.calc_mut().clear_history();
        session.settle();
        println!("history cleared");
        return Ok(());
    }

    let history = session.calc().history();
    let entries = history.iter().take(limit.unwrap_or(usize::MAX));
    if json {
        let entries: Vec<_> = entries.collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if history.is_empty() {
        println!("(no history)");
        return Ok(());
    }
    for entry in entries {
        println!(
            "{}  {} = {}",
            millis_to_timestamp_string(entry.timestamp),
            entry.expression,
            entry.result
        );
    }
    Ok(())
}

fn cmd_export(cli: &Cli, format: ExportFormat, path: &Path) -> Result<()> {
    let session = open_session(cli)?;
    let history = session.calc().history();
    let content = match format {
        ExportFormat::Csv => history_to_csv(history.iter()).context("failed to build CSV")?,
        ExportFormat::Html => {
            history_to_html(history.iter(), &millis_to_timestamp_string(now_unix_millis()))
        }
    };
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), entries = history.len(), "exported history");

    println!("exported {} entries to {}", history.len(), path.display());
    Ok(())
}

fn cmd_memory(cli: &Cli, action: &MemoryAction) -> Result<()> {
    let mut session = open_session(cli)?;
    let calc = session.calc_mut();
    match action {
        MemoryAction::Show | MemoryAction::Recall => {}
        MemoryAction::Clear => calc.memory_clear(),
        MemoryAction::Store { value } => calc.memory_store(parse_operand(value)?),
        MemoryAction::Add { value } => calc.memory_add(parse_operand(value)?),
        MemoryAction::Sub { value } => calc.memory_subtract(parse_operand(value)?),
    }
    let overflowed = calc.display() == ERROR_DISPLAY;
    let value = calc.memory_recall();
    session.settle();

    if overflowed {
        bail!("memory overflow, register kept at {}", format_number(value));
    }
    println!("{}", format_number(value));
    Ok(())
}

// ---------------------------------------------------------------------------
// Converters
// ---------------------------------------------------------------------------

fn cmd_convert(value: f64, from: &str, to: &str, category: Option<&str>) -> Result<()> {
    let category = category
        .map(str::parse::<Category>)
        .transpose()
        .context("conversion error")?;
    let (category, from_unit) = find_unit(from, category).context("conversion error")?;
    let (_, to_unit) = find_unit(to, Some(category))
        .with_context(|| format!("'{to}' is not a {category} unit"))?;
    let result = abacus_core::units::convert(value, from_unit, to_unit, category);

    println!(
        "{} {} = {} {}",
        format_number(value),
        from_unit.symbol,
        format_number(result),
        to_unit.symbol
    );
    Ok(())
}

fn cmd_units(category: Option<&str>) -> Result<()> {
    let Some(name) = category else {
        for c in Category::ALL {
            println!("{c}");
        }
        return Ok(());
    };
    let category: Category = name.parse()?;
    for unit in category.units() {
        println!("{:<8} {}", unit.symbol, unit.name);
    }
    Ok(())
}

fn cmd_currency(amount: f64, from: &str, to: &str, live: bool) -> Result<()> {
    let mut feed = RateFeed::new();
    if live {
        let ticket = feed.begin_fetch();
        let rates = mock_fetch(&mut rand::rng());
        feed.complete(ticket, rates, now_unix_millis());
    }
    let result = feed
        .rates()
        .convert(amount, from, to)
        .context("currency conversion error")?;

    println!(
        "{} {} = {} {}",
        format_number(amount),
        from.to_uppercase(),
        format_number(result),
        to.to_uppercase()
    );
    if let Some(updated) = feed.updated_at() {
        println!("rates updated {}", millis_to_timestamp_string(updated));
    }
    Ok(())
}

fn cmd_currencies() -> Result<()> {
    let rates = RateTable::mock();
    for currency in &CURRENCIES {
        let rate = rates.rate(currency.code).unwrap_or(f64::NAN);
        println!(
            "{}  {:<4} {:<20} {}",
            currency.code,
            currency.symbol,
            currency.name,
            format_number(rate)
        );
    }
    Ok(())
}

fn cmd_date(action: &DateAction) -> Result<()> {
    match action {
        DateAction::Diff { from, to } => {
            let diff = DateDifference::between(from.parse()?, to.parse()?);
            println!("difference:     {}", diff.describe());
            println!("total days:     {}", diff.total_days);
            println!("business days:  {}", diff.business_days);
        }
        DateAction::Add { date, days } => println!("{}", add_days(date, *days)?),
        DateAction::Sub { date, days } => println!("{}", subtract_days(date, *days)?),
        DateAction::Info { date } => {
            let date: CalendarDate = date.parse()?;
            println!("{date}  {}, {}", date.weekday_name(), date.long_format());
            println!(
                "leap year:      {}",
                if is_leap_year(date.year) { "yes" } else { "no" }
            );
            println!("days in month:  {}", days_in_month(date.year, date.month)?);
        }
    }
    Ok(())
}

fn cmd_solve(equation: &str, var: &str) -> Result<()> {
    let value = solve_linear(equation, var)
        .with_context(|| format!("cannot solve '{equation}' for {var}"))?;
    println!("{var} = {}", format_number(value));
    Ok(())
}

fn cmd_plot(cli: &Cli, expression: &str, x: (f64, f64), y: (f64, f64)) -> Result<()> {
    let session = open_session(cli)?;
    let settings = session.settings();
    let viewport = Viewport::new(
        x,
        y,
        settings.plot_width as f64,
        settings.plot_height as f64,
    )?;
    let points = plot(expression, x.0, x.1).context("cannot plot")?;

    print!("{}", chart::render(&points, &viewport));
    println!(
        "y = {expression}   x: [{}, {}]  y: [{}, {}]  {} points",
        x.0,
        x.1,
        y.0,
        y.1,
        points.len()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Themes, mode, state
// ---------------------------------------------------------------------------

struct ThemeArgs<'a> {
    name: Option<&'a str>,
    toggle: bool,
    list: bool,
    define: Option<&'a str>,
    colors: Option<&'a [String]>,
    dark: bool,
    delete: Option<&'a str>,
}

fn cmd_theme(cli: &Cli, args: ThemeArgs<'_>) -> Result<()> {
    let mut session = open_session(cli)?;

    if let (Some(name), Some(colors)) = (args.define, args.colors) {
        let [primary, secondary, accent, background, surface, text] = colors else {
            bail!("--colors needs exactly six values");
        };
        let colors = ThemeColors {
            primary: primary.clone(),
            secondary: secondary.clone(),
            accent: accent.clone(),
            background: background.clone(),
            surface: surface.clone(),
            text: text.clone(),
        };
        let theme = CustomTheme::new(name, colors, args.dark)?;
        println!("defined theme '{}' ({})", theme.name, theme.id);
        session.themes_mut().create(theme);
    }

    if let Some(id) = args.delete {
        if !session.themes_mut().delete(id) {
            bail!("no custom theme with id '{id}'");
        }
        println!("deleted theme {id}");
    }

    if args.list {
        let current = session.calc().theme().name.clone();
        for theme in builtin_themes() {
            let mark = if theme.name == current { "*" } else { " " };
            println!("{mark} {}", theme.name);
        }
        for custom in session.themes().themes() {
            let mark = if custom.name == current { "*" } else { " " };
            println!("{mark} {}  (custom, {})", custom.name, custom.id);
        }
    }

    if let Some(name) = args.name {
        let theme = session
            .themes()
            .resolve(name)
            .with_context(|| format!("unknown theme '{name}'"))?;
        session.calc_mut().set_theme(theme);
    } else if args.toggle {
        session.calc_mut().toggle_theme();
    }

    session.settle();
    if !args.list {
        let theme = session.calc().theme();
        println!(
            "theme: {} ({})",
            theme.name,
            if theme.is_dark { "dark" } else { "light" }
        );
        if cli.verbose {
            for (var, value) in theme.css_variables() {
                println!("  {var}: {value}");
            }
        }
    }
    Ok(())
}

fn cmd_mode(cli: &Cli, mode: Option<&str>, scientific: bool) -> Result<()> {
    let mut session = open_session(cli)?;
    if let Some(mode) = mode {
        session.calc_mut().set_mode(mode.parse::<Mode>()?);
    }
    if scientific {
        session.calc_mut().toggle_scientific();
    }
    session.settle();

    let calc = session.calc();
    println!(
        "mode: {}{}",
        calc.mode(),
        if calc.is_scientific() { " (scientific panel)" } else { "" }
    );
    Ok(())
}

fn cmd_state(cli: &Cli, action: &StateAction) -> Result<()> {
    let session = open_session(cli)?;
    let store = session.store().store();
    match action {
        StateAction::Export { path } => {
            store
                .export_state_file(path)
                .context("failed to export state")?;
            tracing::info!(path = %path.display(), "exported state");
            println!("exported state to {}", path.display());
        }
        StateAction::Import { path } => {
            let state = store
                .import_state_file(path)
                .context("failed to import state")?;
            println!(
                "imported state from {}: {} history entries, memory {}",
                path.display(),
                state.history.len(),
                format_number(state.memory)
            );
        }
    }
    Ok(())
}

fn cmd_profiles() -> Result<()> {
    let profiles = list_profiles(&data_dir()).context("failed to list profiles")?;
    if profiles.is_empty() {
        println!("(no profiles)");
    }
    for name in profiles {
        println!("{name}");
    }
    Ok(())
}

fn cmd_stats(cli: &Cli) -> Result<()> {
    let session = open_session(cli)?;
    let stats = session
        .store()
        .store()
        .stats()
        .context("failed to read stats")?;
    let calc = session.calc();

    println!("profile:    {}", session.store().profile());
    if let Some(path) = session.store().path() {
        println!("database:   {}", path.display());
    }
    println!("history:    {}", stats.history_entries);
    println!("memory:     {}", format_number(calc.memory()));
    println!("mode:       {}", calc.mode());
    println!("theme:      {}", calc.theme().name);
    println!("themes:     {} custom", stats.custom_themes);
    println!("keys:       {} ({} bytes)", stats.keys, stats.bytes);
    match stats.last_updated {
        Some(t) => println!("updated:    {}", millis_to_timestamp_string(t)),
        None => println!("updated:    never"),
    }
    Ok(())
}
