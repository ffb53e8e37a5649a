use super::{Event, Result, Runtime};
use crate::error;
use crate::lang::{split_top_level, LineNumber};
use crate::mach::{persist, Command};
use std::ops::RangeInclusive;
use std::time::Instant;

impl Runtime {
    pub(super) fn editor(&mut self, command: Command, text: &str) -> Result<()> {
        match command {
            Command::Run => self.r#run(text),
            Command::List => self.r#list(text),
            Command::New => {
                self.listing.clear();
                self.env.clear();
                self.files.close_all();
                self.dirty = true;
                Ok(())
            }
            Command::Renum => self.r#renum(text),
            Command::Delete => self.r#delete(text),
            Command::Find => self.r#find(text),
            Command::Edit => self.r#edit(text),
            Command::Save => self.r#save(text),
            Command::Load => self.r#load(text),
            _ => Err(error!(InternalError; "NOT AN EDITOR COMMAND")),
        }
    }

    fn r#run(&mut self, text: &str) -> Result<()> {
        self.env.clear();
        self.files.close_all();
        self.key = None;
        self.index();
        if let Some(id) = self.instance.take() {
            self.registry.unregister(id);
        }
        self.pc = if text.is_empty() {
            self.listing.first()
        } else {
            Some(self.target(text)?)
        };
        self.instance = Some(self.registry.register(&self.program_path));
        self.run_started = Instant::now();
        Ok(())
    }

    fn r#list(&mut self, text: &str) -> Result<()> {
        let range = line_range(text)?;
        for line in self.listing.list(range) {
            self.events.push_back(Event::List(line));
        }
        Ok(())
    }

    fn r#renum(&mut self, text: &str) -> Result<()> {
        let mut args = [10, 0, 10];
        if !text.is_empty() {
            for (i, arg) in split_top_level(text, ',').iter().enumerate() {
                if i >= args.len() {
                    return Err(error!(SyntaxError; "RENUM NEW,OLD,STEP"));
                }
                let arg = arg.trim();
                if !arg.is_empty() {
                    args[i] = line_number(arg)?;
                }
            }
        }
        let warnings = self.listing.renum(args[0], args[1], args[2])?;
        self.dirty = true;
        for warning in warnings {
            self.warn(warning);
        }
        Ok(())
    }

    fn r#delete(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Err(error!(SyntaxError; "DELETE NEEDS A RANGE"));
        }
        let range = line_range(text)?;
        if !self.listing.remove_range(range) {
            return Err(error!(UndefinedLine; text.to_string()));
        }
        self.dirty = true;
        Ok(())
    }

    fn r#find(&mut self, text: &str) -> Result<()> {
        let needle = if text.starts_with('"') {
            self.expression(text)?.to_string()
        } else {
            text.to_string()
        };
        for line in self.listing.find(&needle) {
            self.events.push_back(Event::List(line));
        }
        Ok(())
    }

    fn r#edit(&mut self, text: &str) -> Result<()> {
        let args = split_top_level(text, ',');
        if args.len() < 2 || args.len() > 3 {
            return Err(error!(SyntaxError; "EDIT \"OLD\",\"NEW\"[,LINE]"));
        }
        let old = self.expression(&args[0])?.to_string();
        let new = self.expression(&args[1])?.to_string();
        let ln = match args.get(2) {
            Some(ln) => Some(line_number(ln.trim())?),
            None => None,
        };
        for line in self.listing.edit(&old, &new, ln)? {
            self.events.push_back(Event::List(line));
        }
        self.dirty = true;
        Ok(())
    }

    fn r#save(&mut self, text: &str) -> Result<()> {
        let file_name = self.name_operand(text)?;
        let path = self.files.path(&file_name)?;
        persist::save(&self.listing, &path)?;
        if self.program_path.is_empty() {
            self.program_path = file_name;
        }
        Ok(())
    }

    fn r#load(&mut self, text: &str) -> Result<()> {
        let file_name = self.name_operand(text)?;
        let path = self.files.path(&file_name)?;
        self.listing = persist::load(&path)?;
        self.env.clear();
        self.files.close_all();
        self.program_path = file_name;
        self.dirty = true;
        Ok(())
    }
}

fn line_number(s: &str) -> Result<LineNumber> {
    s.trim()
        .parse::<LineNumber>()
        .map_err(|_| error!(SyntaxError; format!("BAD LINE NUMBER {}", s)))
}

/// `a`, `a-b`, `a-` and `-b`. Empty text is every line.
fn line_range(s: &str) -> Result<RangeInclusive<LineNumber>> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(0..=LineNumber::max_value());
    }
    match s.find('-') {
        None => {
            let ln = line_number(s)?;
            Ok(ln..=ln)
        }
        Some(dash) => {
            let (from, to) = (s[..dash].trim(), s[dash + 1..].trim());
            let from = if from.is_empty() { 0 } else { line_number(from)? };
            let to = if to.is_empty() {
                LineNumber::max_value()
            } else {
                line_number(to)?
            };
            Ok(from..=to)
        }
    }
}
