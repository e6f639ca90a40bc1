//! Line-oriented prompts over any reader/writer pair.
//!
//! Every `ask_*` method re-prompts until it gets a valid answer and returns
//! `Ok(None)` once input is exhausted.

use std::io::{BufRead, Write};

use sc_app::AppResult;
use sc_core::{AxisRange, DomainSpec};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, message: impl std::fmt::Display) -> AppResult<()> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }

    /// Trimmed answer line, possibly empty.
    pub fn ask_string(&mut self, prompt: &str) -> AppResult<Option<String>> {
        write!(self.output, "{} ", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Optional text: blank answers become `None` inside the outer option.
    pub fn ask_optional(&mut self, prompt: &str) -> AppResult<Option<Option<String>>> {
        Ok(self
            .ask_string(prompt)?
            .map(|s| if s.is_empty() { None } else { Some(s) }))
    }

    pub fn ask_yes_no(&mut self, prompt: &str) -> AppResult<Option<bool>> {
        loop {
            let Some(answer) = self.ask_string(&format!("{} (y/n):", prompt))? else {
                return Ok(None);
            };
            match answer.to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(Some(true)),
                "n" | "no" => return Ok(Some(false)),
                _ => self.say("Please answer 'y' or 'n'.")?,
            }
        }
    }

    pub fn ask_positive_usize(&mut self, prompt: &str) -> AppResult<Option<usize>> {
        loop {
            let Some(answer) = self.ask_string(prompt)? else {
                return Ok(None);
            };
            match answer.parse::<usize>() {
                Ok(n) if n > 0 => return Ok(Some(n)),
                _ => self.say("Please enter a positive whole number.")?,
            }
        }
    }

    pub fn ask_f64(&mut self, prompt: &str) -> AppResult<Option<f64>> {
        loop {
            let Some(answer) = self.ask_string(prompt)? else {
                return Ok(None);
            };
            match answer.parse::<f64>() {
                Ok(v) if v.is_finite() => return Ok(Some(v)),
                _ => self.say("Please enter a number.")?,
            }
        }
    }

    /// Pick one of `options`; returns its zero-based index.
    pub fn ask_choice(&mut self, prompt: &str, options: &[String]) -> AppResult<Option<usize>> {
        self.say(prompt)?;
        for (i, option) in options.iter().enumerate() {
            self.say(format_args!("  {}. {}", i + 1, option))?;
        }
        loop {
            let Some(answer) = self.ask_string("Choice:")? else {
                return Ok(None);
            };
            match answer.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(Some(n - 1)),
                _ => self.say(format_args!(
                    "Please enter a number between 1 and {}.",
                    options.len()
                ))?,
            }
        }
    }

    /// Axis limits; asks again while max <= min.
    pub fn ask_range(&mut self, axis: &str) -> AppResult<Option<AxisRange>> {
        loop {
            let Some(min) = self.ask_f64(&format!("{} min:", axis))? else {
                return Ok(None);
            };
            let Some(max) = self.ask_f64(&format!("{} max:", axis))? else {
                return Ok(None);
            };
            match AxisRange::new(min, max) {
                Ok(range) => return Ok(Some(range)),
                Err(e) => self.say(e)?,
            }
        }
    }

    /// User-constrained sampling grid; asks again until it is valid.
    pub fn ask_domain(&mut self, unit: &str) -> AppResult<Option<DomainSpec>> {
        loop {
            let Some(min) = self.ask_f64(&format!("Domain min ({}):", unit))? else {
                return Ok(None);
            };
            let Some(max) = self.ask_f64(&format!("Domain max ({}):", unit))? else {
                return Ok(None);
            };
            let Some(count) = self.ask_positive_usize("Number of points:")? else {
                return Ok(None);
            };
            match DomainSpec::custom(min, max, count) {
                Ok(spec) => return Ok(Some(spec)),
                Err(e) => self.say(e)?,
            }
        }
    }
}
