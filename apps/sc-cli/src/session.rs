//! Interactive comparison session.

use std::io::{BufRead, Write};

use sc_app::{
    list_catalog, AppResult, AxisChoice, GeneratedSeriesRequest, Participant, Quantity,
    Renderer, RoundOptions, RoundPlan, RoundReport, Session, StoreRenderer,
};
use sc_core::{DomainKind, DomainSpec};
use sc_results::RenderRequest;
use sc_signals::ScaleMode;

use crate::prompt::Prompter;

/// Prints a short description of each figure and, when configured, also
/// writes it to the plot store.
pub struct ConsoleRenderer<'a, W: Write> {
    out: &'a mut W,
    store: Option<&'a mut StoreRenderer>,
}

impl<'a, W: Write> ConsoleRenderer<'a, W> {
    pub fn new(out: &'a mut W, store: Option<&'a mut StoreRenderer>) -> Self {
        Self { out, store }
    }
}

impl<W: Write> Renderer for ConsoleRenderer<'_, W> {
    fn render(&mut self, round: usize, index: usize, request: &RenderRequest) -> AppResult<()> {
        writeln!(self.out, "Plot {}.{}: {}", round, index + 1, request.title)?;
        writeln!(
            self.out,
            "  x: {} ({:?}), y: {} ({:?})",
            request.x_label, request.x_scale, request.y_label, request.y_scale
        )?;
        if let Some(x) = request.x_limits {
            writeln!(self.out, "  x limits: [{}, {}]", x.min, x.max)?;
        }
        if let Some(y) = request.y_limits {
            writeln!(self.out, "  y limits: [{}, {}]", y.min, y.max)?;
        }
        for series in &request.series {
            writeln!(
                self.out,
                "  - {} ({} points, {:?})",
                series.label,
                series.domain.len(),
                series.style
            )?;
        }
        if let Some(store) = self.store.as_deref_mut() {
            store.render(round, index, request)?;
        }
        Ok(())
    }
}

/// Drive rounds until the user declines to continue or input runs out.
pub fn run_session<R: BufRead, W: Write>(
    session: &mut Session,
    prompter: &mut Prompter<R, W>,
    mut store: Option<&mut StoreRenderer>,
) -> AppResult<()> {
    loop {
        let Some((plan, axis_choice)) = collect_round(session, prompter)? else {
            break;
        };

        let mut renderer = ConsoleRenderer::new(prompter.output(), store.as_deref_mut());
        match session.run_round(plan, axis_choice, &mut renderer) {
            Ok(report) => print_report(prompter, &report)?,
            Err(e) if e.is_recoverable() => prompter.say(format_args!("[ERROR] {}", e))?,
            Err(e) => return Err(e),
        }

        match prompter.ask_yes_no("Plot another round?")? {
            Some(true) => {}
            _ => break,
        }
    }
    prompter.say("Goodbye.")?;
    Ok(())
}

fn print_report<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    report: &RoundReport,
) -> AppResult<()> {
    for adjustment in &report.adjustments {
        prompter.say(format_args!("[INFO] {}", adjustment))?;
    }
    for warning in &report.warnings {
        prompter.say(format_args!("[WARN] {}: {}", warning.label, warning.warning))?;
    }
    for failure in &report.failures {
        prompter.say(format_args!("[ERROR] {}: {}", failure.label, failure.reason))?;
    }
    Ok(())
}

/// Ask for everything one round needs. `None` means input ended.
fn collect_round<R: BufRead, W: Write>(
    session: &mut Session,
    prompter: &mut Prompter<R, W>,
) -> AppResult<Option<(RoundPlan, AxisChoice)>> {
    let Some(graphs) = prompter.ask_positive_usize("How many graphs would you like to plot?")?
    else {
        return Ok(None);
    };

    let mut plan = RoundPlan::default();
    let mut kind: Option<DomainKind> = None;

    for graph in 1..=graphs {
        let Some((participant, found)) = collect_participant(session, prompter, graph, kind)?
        else {
            return Ok(None);
        };
        kind = Some(found);
        plan.push(participant);
    }

    let Some(kind) = kind else {
        return Ok(None);
    };

    let mut options = RoundOptions::default();
    if graphs > 1 {
        let Some(combined) = prompter.ask_yes_no("Combine all graphs into one plot?")? else {
            return Ok(None);
        };
        options.combined = combined;
    }

    if kind == DomainKind::Frequency {
        let quantities = vec!["magnitude".to_string(), "phase".to_string()];
        let Some(q) = prompter.ask_choice("Plot which quantity?", &quantities)? else {
            return Ok(None);
        };
        if q == 1 {
            options.quantity = Quantity::Phase;
        }
        let Some(log_x) = prompter.ask_yes_no("Use a logarithmic frequency axis?")? else {
            return Ok(None);
        };
        options.log_x = log_x;
    }

    if options.quantity == Quantity::Magnitude {
        let scales = vec!["linear".to_string(), "dB".to_string()];
        let Some(s) = prompter.ask_choice("Magnitude scale:", &scales)? else {
            return Ok(None);
        };
        if s == 1 {
            options.scale_mode = ScaleMode::Decibel;
        }
    }

    if kind == DomainKind::Frequency
        && options.quantity == Quantity::Magnitude
        && options.scale_mode == ScaleMode::Linear
    {
        let Some(log_y) = prompter.ask_yes_no("Use a logarithmic magnitude axis?")? else {
            return Ok(None);
        };
        options.log_y = log_y;
    }
    plan.options = options;

    let Some(axis_choice) = collect_axis_choice(session, prompter)? else {
        return Ok(None);
    };
    Ok(Some((plan, axis_choice)))
}

fn collect_participant<R: BufRead, W: Write>(
    session: &mut Session,
    prompter: &mut Prompter<R, W>,
    graph: usize,
    round_kind: Option<DomainKind>,
) -> AppResult<Option<(Participant, DomainKind)>> {
    let sources = vec!["data file".to_string(), "formula".to_string()];
    loop {
        let Some(source) = prompter.ask_choice(&format!("Graph {}: source?", graph), &sources)?
        else {
            return Ok(None);
        };

        let picked = if source == 0 {
            collect_measured(session, prompter)?
        } else {
            collect_generated(session, prompter)?
        };
        let Some((participant, found)) = picked else {
            return Ok(None);
        };

        match round_kind {
            Some(expected) if expected != found => {
                prompter.say(format_args!(
                    "[ERROR] Cannot plot {} data alongside {} data; choose another source.",
                    found, expected
                ))?;
            }
            _ => return Ok(Some((participant, found))),
        }
    }
}

fn collect_measured<R: BufRead, W: Write>(
    session: &mut Session,
    prompter: &mut Prompter<R, W>,
) -> AppResult<Option<(Participant, DomainKind)>> {
    let mut handle: Option<String> = None;

    if !session.catalog().is_empty() {
        let Some(reuse) = prompter.ask_yes_no("Reuse a previously loaded file?")? else {
            return Ok(None);
        };
        if reuse {
            let listing: Vec<String> = list_catalog(session.catalog())
                .into_iter()
                .map(|summary| {
                    format!("{} ({}, {} points)", summary.handle, summary.kind, summary.points)
                })
                .collect();
            let Some(idx) = prompter.ask_choice("Loaded files:", &listing)? else {
                return Ok(None);
            };
            handle = session
                .catalog()
                .get_index(idx)
                .map(|s| s.handle().to_string());
        }
    }

    let (handle, kind) = match handle {
        Some(handle) => {
            let kind = session.load_source(&handle)?.kind();
            (handle, kind)
        }
        None => loop {
            let Some(path) = prompter.ask_string("Path to data file:")? else {
                return Ok(None);
            };
            match session.load_source(&path) {
                Ok(series) => {
                    let kind = series.kind();
                    break (path, kind);
                }
                Err(e) if e.is_recoverable() => prompter.say(format_args!("[ERROR] {}", e))?,
                Err(e) => return Err(e),
            }
        },
    };

    let Some(label) = prompter.ask_optional("Legend label (blank for file name):")? else {
        return Ok(None);
    };
    Ok(Some((Participant::Measured { handle, label }, kind)))
}

fn collect_generated<R: BufRead, W: Write>(
    session: &mut Session,
    prompter: &mut Prompter<R, W>,
) -> AppResult<Option<(Participant, DomainKind)>> {
    let entries = session.registry().entries().to_vec();
    let listing: Vec<String> = entries
        .iter()
        .map(|e| format!("{} - {} ({})", e.id, e.name, e.family()))
        .collect();
    let Some(idx) = prompter.ask_choice("Formulas:", &listing)? else {
        return Ok(None);
    };
    let entry = entries[idx];
    let family = entry.family();

    let Some(custom) = prompter.ask_yes_no("Set a custom domain?")? else {
        return Ok(None);
    };
    let spec = if custom {
        let Some(spec) = prompter.ask_domain(family.unit())? else {
            return Ok(None);
        };
        spec
    } else {
        DomainSpec::unconstrained(session.config().defaults_for(family))
    };

    let Some(label) = prompter.ask_optional("Legend label (blank for formula id):")? else {
        return Ok(None);
    };
    let mut request = GeneratedSeriesRequest::new(entry.id, spec);
    if let Some(label) = label {
        request = request.with_label(label);
    }
    Ok(Some((Participant::Generated(request), family)))
}

fn collect_axis_choice<R: BufRead, W: Write>(
    session: &Session,
    prompter: &mut Prompter<R, W>,
) -> AppResult<Option<AxisChoice>> {
    if session.preferences().has_saved() {
        let Some(use_saved) = prompter.ask_yes_no("Use saved axis ranges?")? else {
            return Ok(None);
        };
        if use_saved {
            return Ok(Some(AxisChoice::UseSaved));
        }
    }

    let mut ranges = [None, None];
    for (slot, axis) in ranges.iter_mut().zip(["x-axis", "y-axis"]) {
        let Some(set) = prompter.ask_yes_no(&format!("Set {} range?", axis))? else {
            return Ok(None);
        };
        if set {
            let Some(range) = prompter.ask_range(axis)? else {
                return Ok(None);
            };
            *slot = Some(range);
        }
    }
    let [x, y] = ranges;

    let save = if x.is_some() || y.is_some() {
        let Some(save) = prompter.ask_yes_no("Save these ranges for later rounds?")? else {
            return Ok(None);
        };
        save
    } else {
        false
    };

    Ok(Some(AxisChoice::Explicit { x, y, save }))
}
