use super::{Event, InputRequest, Result, Runtime, State};
use crate::error;
use crate::lang::{
    ast::Expression, find_assignment, find_keyword, name, parse, split_top_level,
    split_unquoted, LineNumber, Pointer,
};
use crate::mach::files::Mode;
use crate::mach::{sql, Catalog, Command, Field, Frame, Function, Subscript, UserFunction, Val};
use std::convert::TryFrom;
use std::path::PathBuf;
use std::time::Duration;

/// Where an assignment lands.
enum Reference {
    Scalar(String),
    Element(String, Vec<Subscript>),
}

impl Runtime {
    pub(super) fn dispatch(&mut self, pc: Pointer, statement: &str) -> Result<()> {
        let statement = statement.trim();
        if statement.is_empty() {
            return Ok(());
        }
        let (command, rest) = match Command::split(statement) {
            Some(split) => split,
            None if find_assignment(statement).is_some() => (Command::Let, statement),
            None => return Err(error!(UnknownStatement; statement.to_string())),
        };
        if command.is_editor() {
            if !pc.is_direct() {
                return Err(error!(SyntaxError; "DIRECT MODE ONLY"));
            }
            return self.editor(command, rest);
        }
        match command {
            Command::Let => self.r#let(rest),
            Command::Dim => self.r#dim(rest),
            Command::Print => self.r#print(rest),
            Command::If => self.r#if(pc, rest),
            Command::Goto => self.r#goto(rest),
            Command::For => self.r#for(rest),
            Command::Next => self.r#next(rest),
            Command::Gosub => self.r#gosub(rest),
            Command::Return => self.r#return(),
            Command::On => self.r#on(rest),
            Command::Input => self.r#input(rest),
            Command::Get => self.r#get(rest),
            Command::End => {
                self.stop();
                Ok(())
            }
            Command::Rem | Command::Data | Command::Label => Ok(()),
            Command::Read => self.r#read(rest),
            Command::Restore => {
                self.env.restore();
                Ok(())
            }
            Command::Def => self.r#def(rest),
            Command::Cls => {
                self.events.push_back(Event::Cls);
                Ok(())
            }
            Command::Color => self.r#color(rest),
            Command::Locate => self.r#locate(rest),
            Command::Open => self.r#open(rest),
            Command::PrintFile => self.r#print_file(rest),
            Command::InputFile => self.r#input_file(rest),
            Command::GetFile => self.r#get_file(rest),
            Command::SeekFile => self.r#seek_file(rest),
            Command::Close => self.r#close(rest),
            Command::Sql => self.r#sql(rest),
            Command::SaveState => self.r#savestate(rest),
            Command::LoadState => self.r#loadstate(rest),
            Command::ClearState => self.r#clearstate(rest),
            Command::States => self.r#states(),
            Command::Wait => self.r#wait(rest),
            Command::Share => self.r#share(rest),
            _ => Err(error!(InternalError; "EDITOR COMMAND")),
        }
    }

    // *** Assignment

    fn r#let(&mut self, text: &str) -> Result<()> {
        let eq = match find_assignment(text) {
            Some(eq) => eq,
            None => return Err(error!(SyntaxError; "MISSING =")),
        };
        let target = text[..eq].trim();
        let value = text[eq + 1..].trim();
        let reference = self.reference(target)?;
        if let Reference::Scalar(var_name) = &reference {
            if Catalog::is_reserved(var_name) {
                if name::normalize(var_name) == "INKEY$" && (value.is_empty() || value == "\"\"") {
                    self.key = None;
                    return Ok(());
                }
                return Err(error!(IllegalVariableName; var_name.clone()));
            }
        }
        if value.is_empty() {
            match reference {
                Reference::Scalar(var_name) => self.env.remove(&var_name),
                Reference::Element(var_name, index) => self.env.remove_element(&var_name, &index),
            };
            return Ok(());
        }
        let val = self.expression(value)?;
        self.put(reference, val)
    }

    fn reference(&self, target: &str) -> Result<Reference> {
        match parse(target) {
            Ok(Expression::Var(_, var_name)) => Ok(Reference::Scalar(var_name)),
            Ok(Expression::Call(_, var_name, args)) => {
                let upper = name::normalize(&var_name);
                if Function::is_builtin(&upper) || upper.starts_with("FN") {
                    return Err(error!(IllegalVariableName; target.to_string()));
                }
                let index = self.evaluate(|e| e.subscripts(&args))?;
                Ok(Reference::Element(var_name, index))
            }
            _ => Err(error!(IllegalVariableName; target.to_string())),
        }
    }

    fn put(&mut self, reference: Reference, val: Val) -> Result<()> {
        match reference {
            Reference::Scalar(var_name) => {
                if Catalog::is_reserved(&var_name) {
                    return Err(error!(IllegalVariableName; var_name));
                }
                self.env.update(&var_name, val)
            }
            Reference::Element(var_name, index) => self.env.set_element(&var_name, index, val),
        }
    }

    /// Store text that came from outside the program. String names keep
    /// it as typed; other names take the literal's value.
    fn put_raw(&mut self, target: &str, raw: &str) -> Result<()> {
        let reference = self.reference(target)?;
        let string = match &reference {
            Reference::Scalar(var_name) | Reference::Element(var_name, _) => {
                name::is_string(var_name)
            }
        };
        let val = if string {
            Val::Text(raw.to_string())
        } else {
            Val::from_literal(raw)
        };
        self.put(reference, val)
    }

    fn r#dim(&mut self, text: &str) -> Result<()> {
        for item in split_top_level(text, ',') {
            let (var_name, args) = match parse(item.trim())? {
                Expression::Call(_, var_name, args) => (var_name, args),
                _ => return Err(error!(SyntaxError; "MISSING DIMENSIONS")),
            };
            let bounds = self.evaluate(|e| {
                let mut bounds = Vec::with_capacity(args.len());
                for arg in &args {
                    bounds.push(i64::try_from(&e.value(arg)?)?);
                }
                Ok(bounds)
            })?;
            self.env.dimension(&var_name, &bounds)?;
        }
        Ok(())
    }

    // *** Output

    fn r#print(&mut self, text: &str) -> Result<()> {
        let fields = self.evaluate(|e| e.list(text))?;
        let s = render_fields(&fields);
        self.output(s);
        Ok(())
    }

    // *** Control flow

    fn r#if(&mut self, pc: Pointer, text: &str) -> Result<()> {
        let then = match find_keyword(text, "then") {
            Some(then) => then,
            None => return Err(error!(SyntaxError; "MISSING THEN")),
        };
        let condition = text[..then].trim();
        let clause = text[then + 4..].trim();
        if !self.condition(condition)? {
            return Ok(());
        }
        if !clause.is_empty() && clause.chars().all(|c| c.is_ascii_digit()) {
            return self.r#goto(clause);
        }
        self.dispatch(pc, clause)
    }

    fn condition(&self, text: &str) -> Result<bool> {
        let lower = text.to_ascii_lowercase();
        if lower.starts_with("not defined ") {
            return Ok(!self.is_defined(&text[12..])?);
        }
        if lower.starts_with("defined ") {
            return self.is_defined(&text[8..]);
        }
        for (suffix, empty) in &[("<>\"\"", false), ("=\"\"", true)] {
            if let Some(var_name) = text.strip_suffix(suffix) {
                let var_name = var_name.trim();
                if name::is_legal(var_name) {
                    let is_empty = match self.lookup(var_name) {
                        None => true,
                        Some(Val::Text(s)) => s.is_empty(),
                        Some(Val::Number(_)) => false,
                    };
                    return Ok(is_empty == *empty);
                }
            }
        }
        Ok(self.expression(text)?.is_truthy())
    }

    fn lookup(&self, var_name: &str) -> Option<Val> {
        if let Some(val) = self.catalog().get(var_name) {
            return Some(val);
        }
        self.env.get(var_name).cloned()
    }

    fn is_defined(&self, text: &str) -> Result<bool> {
        match parse(text.trim())? {
            Expression::Var(_, var_name) => {
                Ok(Catalog::is_reserved(&var_name) || self.env.contains(&var_name))
            }
            Expression::Call(_, var_name, args) => {
                let index = self.evaluate(|e| e.subscripts(&args))?;
                Ok(self.env.get_element(&var_name, &index).is_some())
            }
            _ => Err(error!(SyntaxError; "DEFINED NEEDS A NAME")),
        }
    }

    /// Resolve a GOTO style operand: a line number, a label, or an
    /// expression giving either.
    pub(super) fn target(&self, text: &str) -> Result<Pointer> {
        let text = text.trim();
        let text = text.strip_prefix('!').unwrap_or(text);
        let line = if let Ok(ln) = text.parse::<LineNumber>() {
            ln
        } else if let Some(ln) = self.env.label(text) {
            ln
        } else {
            match self.expression(text)? {
                Val::Number(n) if n.fract() == 0.0 && n >= 0.0 && n <= LineNumber::max_value() as f64 => {
                    n as LineNumber
                }
                Val::Text(s) => match self.env.label(s.trim_start_matches('!')) {
                    Some(ln) => ln,
                    None => return Err(error!(UndefinedLine; s)),
                },
                val => return Err(error!(UndefinedLine; val.to_string())),
            }
        };
        if self.listing.contains(line) {
            Ok(Pointer::line(line))
        } else {
            Err(error!(UndefinedLine; line.to_string()))
        }
    }

    fn r#goto(&mut self, text: &str) -> Result<()> {
        self.pc = Some(self.target(text)?);
        Ok(())
    }

    fn r#gosub(&mut self, text: &str) -> Result<()> {
        let target = self.target(text)?;
        self.env.push_frame(Frame::new_call(self.pc))?;
        self.pc = Some(target);
        Ok(())
    }

    fn r#return(&mut self) -> Result<()> {
        match self.env.top_frame() {
            Some(Frame::Call(_)) => {}
            _ => return Err(error!(ReturnWithoutGosub)),
        }
        if let Some(Frame::Call(frame)) = self.env.pop_frame() {
            self.pc = frame.resume;
        }
        Ok(())
    }

    fn r#for(&mut self, text: &str) -> Result<()> {
        let eq = match find_assignment(text) {
            Some(eq) => eq,
            None => return Err(error!(SyntaxError; "MISSING =")),
        };
        let var_name = match self.reference(text[..eq].trim())? {
            Reference::Scalar(var_name) if !Catalog::is_reserved(&var_name) => var_name,
            _ => return Err(error!(IllegalVariableName; text[..eq].trim().to_string())),
        };
        let bounds = &text[eq + 1..];
        let to = match find_keyword(bounds, "to") {
            Some(to) => to,
            None => return Err(error!(SyntaxError; "MISSING TO")),
        };
        let after = &bounds[to + 2..];
        let (end, step) = match find_keyword(after, "step") {
            Some(s) => (&after[..s], Some(&after[s + 4..])),
            None => (after, None),
        };
        let start = self.integer(&bounds[..to])?;
        let end = self.integer(end)?;
        let step = match step {
            Some(step) => self.integer(step)?,
            None => 1,
        };
        self.env.update(&var_name, Val::Number(start as f64))?;
        let body = self.pc;
        let existing = self.env.frames_mut().find(|f| f.is_loop_over(&var_name));
        if let Some(Frame::Loop(frame)) = existing {
            frame.end = end;
            frame.step = step;
            frame.body = body;
            return Ok(());
        }
        self.env.push_frame(Frame::new_loop(&var_name, end, step, body))
    }

    fn r#next(&mut self, text: &str) -> Result<()> {
        let (var_name, end, step, body) = match self.env.top_frame() {
            Some(Frame::Loop(f)) => (f.var.clone(), f.end, f.step, f.body),
            _ => return Err(error!(NextWithoutFor)),
        };
        if !text.is_empty() && name::normalize(text) != var_name {
            return Err(error!(NextWithoutFor; text.to_string()));
        }
        let current = match self.env.get(&var_name) {
            Some(val) => val.number()?,
            None => 0.0,
        };
        let next = current + step as f64;
        self.env.update(&var_name, Val::Number(next))?;
        let more = if step >= 0 {
            next <= end as f64
        } else {
            next >= end as f64
        };
        if more {
            self.pc = body;
        } else {
            self.env.pop_frame();
        }
        Ok(())
    }

    fn r#on(&mut self, text: &str) -> Result<()> {
        let (at, gosub) = match (find_keyword(text, "goto"), find_keyword(text, "gosub")) {
            (Some(at), _) => (at, false),
            (None, Some(at)) => (at, true),
            (None, None) => return Err(error!(SyntaxError; "MISSING GOTO OR GOSUB")),
        };
        let n = self.integer(&text[..at])?;
        if n < 0 {
            return Err(error!(IllegalFunctionCall; n.to_string()));
        }
        let keyword_len = if gosub { 5 } else { 4 };
        let targets = split_top_level(&text[at + keyword_len..], ',');
        let target = match targets.get((n as usize).wrapping_sub(1)) {
            Some(target) if n > 0 => target.clone(),
            _ => return Ok(()),
        };
        if gosub {
            self.r#gosub(&target)
        } else {
            self.r#goto(&target)
        }
    }

    // *** Input

    fn r#input(&mut self, text: &str) -> Result<()> {
        if self.config.script {
            return Ok(());
        }
        let (prompt, vars) = split_prompt(text);
        let targets: Vec<String> = split_top_level(vars, ',')
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if targets.is_empty() {
            return Err(error!(SyntaxError; "MISSING VARIABLE"));
        }
        self.state = State::Input(InputRequest {
            prompt,
            targets,
            key: false,
        });
        Ok(())
    }

    fn r#get(&mut self, text: &str) -> Result<()> {
        if self.config.script {
            return Ok(());
        }
        if text.is_empty() {
            return Err(error!(SyntaxError; "MISSING VARIABLE"));
        }
        self.state = State::Input(InputRequest {
            prompt: String::new(),
            targets: vec![text.to_string()],
            key: true,
        });
        Ok(())
    }

    pub(super) fn answer(&mut self, request: &InputRequest, text: &str) -> Result<()> {
        if request.key {
            let key: String = text.chars().take(1).collect();
            for target in &request.targets {
                self.put_raw(target, &key)?;
            }
            return Ok(());
        }
        let answers = split_unquoted(text, ',');
        for (i, target) in request.targets.iter().enumerate() {
            let answer = answers.get(i).map(|s| s.trim()).unwrap_or_default();
            self.put_raw(target, answer)?;
        }
        Ok(())
    }

    fn r#read(&mut self, text: &str) -> Result<()> {
        for target in split_top_level(text, ',') {
            let item = self.env.read_data()?.to_string();
            let val = self.expression(&item)?;
            let reference = self.reference(target.trim())?;
            self.put(reference, val)?;
        }
        Ok(())
    }

    fn r#def(&mut self, text: &str) -> Result<()> {
        let eq = match find_assignment(text) {
            Some(eq) => eq,
            None => return Err(error!(SyntaxError; "MISSING =")),
        };
        let (fn_name, args) = match parse(text[..eq].trim())? {
            Expression::Call(_, fn_name, args) => (name::normalize(&fn_name), args),
            Expression::Var(_, fn_name) => (name::normalize(&fn_name), vec![]),
            _ => return Err(error!(SyntaxError; "BAD FUNCTION NAME")),
        };
        if !fn_name.starts_with("FN") || !name::is_legal(&fn_name) {
            return Err(error!(SyntaxError; fn_name));
        }
        let mut params = Vec::with_capacity(args.len());
        for arg in args {
            match arg {
                Expression::Var(_, param) if param.len() == 1 && param.chars().all(|c| c.is_ascii_alphabetic()) => {
                    params.push(name::normalize(&param))
                }
                _ => return Err(error!(SyntaxError; "PARAMETERS ARE SINGLE LETTERS")),
            }
        }
        let body = parse(text[eq + 1..].trim())?;
        self.env.define(UserFunction {
            name: fn_name,
            params,
            body,
        });
        Ok(())
    }

    // *** Screen

    fn r#color(&mut self, text: &str) -> Result<()> {
        let args = split_top_level(text, ',');
        let fg = color_value(self.integer(&args[0])?)?;
        let bg = match args.get(1) {
            Some(bg) => color_value(self.integer(bg)?)?,
            None => self.bg,
        };
        self.fg = fg;
        self.bg = bg;
        self.events.push_back(Event::Color(fg, bg));
        Ok(())
    }

    fn r#locate(&mut self, text: &str) -> Result<()> {
        let args = split_top_level(text, ',');
        if args.len() != 2 {
            return Err(error!(SyntaxError; "LOCATE ROW,COL"));
        }
        let row = u16::try_from(self.integer(&args[0])?);
        let col = u16::try_from(self.integer(&args[1])?);
        match (row, col) {
            (Ok(row), Ok(col)) => {
                self.events.push_back(Event::Locate(row, col));
                Ok(())
            }
            _ => Err(error!(IllegalFunctionCall; "LOCATE")),
        }
    }

    // *** File handles

    fn r#open(&mut self, text: &str) -> Result<()> {
        let args = split_top_level(text, ',');
        if args.len() != 3 {
            return Err(error!(SyntaxError; "OPEN#N,NAME,MODE"));
        }
        let number = self.integer(&args[0])?;
        let file_name = self.name_operand(&args[1])?;
        let mode = args[2].trim();
        let mode = if mode.len() == 1 {
            Mode::from_letter(mode)?
        } else {
            Mode::from_letter(&self.name_operand(mode)?)?
        };
        self.files.open(number, &file_name, mode)
    }

    fn r#print_file(&mut self, text: &str) -> Result<()> {
        let args = split_top_level(text, ',');
        let number = self.integer(&args[0])?;
        let list = args[1..].join(",");
        let fields = self.evaluate(|e| e.list(&list))?;
        let s = render_fields(&fields);
        self.files.write(number, &s)
    }

    fn r#input_file(&mut self, text: &str) -> Result<()> {
        let args = split_top_level(text, ',');
        let number = self.integer(&args[0])?;
        for target in &args[1..] {
            let line = self.files.read_line(number)?;
            self.put_raw(target.trim(), &line)?;
        }
        Ok(())
    }

    fn r#get_file(&mut self, text: &str) -> Result<()> {
        let args = split_top_level(text, ',');
        let number = self.integer(&args[0])?;
        for target in &args[1..] {
            let c = self.files.read_char(number)?;
            let reference = self.reference(target.trim())?;
            self.put(reference, Val::Text(c))?;
        }
        Ok(())
    }

    fn r#seek_file(&mut self, text: &str) -> Result<()> {
        let args = split_top_level(text, ',');
        if args.len() != 2 {
            return Err(error!(SyntaxError; "SEEK#N,POSITION"));
        }
        let number = self.integer(&args[0])?;
        let position = self.integer(&args[1])?;
        self.files.seek(number, position)
    }

    fn r#close(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            self.files.close_all();
            return Ok(());
        }
        for arg in split_top_level(text, ',') {
            let number = self.integer(&arg)?;
            self.files.close(number)?;
        }
        Ok(())
    }

    // *** Database

    fn database_path(&self) -> Result<PathBuf> {
        let db = self.env.get("DB$").map(|val| val.to_string());
        sql::database_path(&self.config.file_root, db.as_deref())
    }

    fn r#sql(&mut self, text: &str) -> Result<()> {
        let query = if text.starts_with('"') {
            self.expression(text)?.to_string()
        } else {
            text.to_string()
        };
        let path = self.database_path()?;
        let rows = self.database.query(&path, &query)?;
        let globals = self.env.globals_mut();
        globals.remove_array("SQL$");
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let index = vec![Subscript::Int(r as i64), Subscript::Int(c as i64)];
                globals.store_element("SQL$", index, Val::Text(cell.clone()))?;
            }
        }
        let cols = rows.first().map(|row| row.len()).unwrap_or(0);
        globals.store("SQLROWS", Val::Number(rows.len() as f64))?;
        globals.store("SQLCOLS", Val::Number(cols as f64))
    }

    fn r#savestate(&mut self, text: &str) -> Result<()> {
        let state = self.name_operand(text)?;
        let path = self.database_path()?;
        let vars: Vec<(String, String)> = self
            .env
            .globals()
            .scalars()
            .into_iter()
            .map(|(var_name, val)| (var_name.to_string(), val.render()))
            .collect();
        self.database.save_state(&path, &state, &vars)
    }

    fn r#loadstate(&mut self, text: &str) -> Result<()> {
        let state = self.name_operand(text)?;
        let path = self.database_path()?;
        for (var_name, value) in self.database.load_state(&path, &state)? {
            self.env.set(&var_name, Val::from_literal(&value))?;
        }
        Ok(())
    }

    fn r#clearstate(&mut self, text: &str) -> Result<()> {
        let state = self.name_operand(text)?;
        let path = self.database_path()?;
        self.database.clear_state(&path, &state)
    }

    fn r#states(&mut self) -> Result<()> {
        let path = self.database_path()?;
        for state in self.database.states(&path)? {
            self.output(format!("{}\n", state));
        }
        Ok(())
    }

    // *** Host interaction

    fn r#wait(&mut self, text: &str) -> Result<()> {
        let secs = self.expression(text)?.number()?;
        if !secs.is_finite() || secs < 0.0 {
            return Err(error!(IllegalFunctionCall; "WAIT"));
        }
        let secs = secs.min(self.config.wait_limit.as_secs_f64());
        std::thread::sleep(Duration::from_secs_f64(secs));
        Ok(())
    }

    fn r#share(&mut self, text: &str) -> Result<()> {
        let mut values = vec![];
        for var_name in split_top_level(text, ',') {
            let var_name = name::normalize(&var_name);
            if !name::is_legal(&var_name) || name::is_local(&var_name) {
                return Err(error!(IllegalVariableName; var_name));
            }
            let val = match self.env.get(&var_name) {
                Some(val) => val.clone(),
                None => Val::default_for(&var_name),
            };
            values.push((var_name, val));
        }
        if let Some(id) = self.instance {
            self.registry.share(id, &values);
        }
        Ok(())
    }
}

/// Fields as PRINT shows them. A trailing separator keeps the line open.
fn render_fields(fields: &[Field]) -> String {
    let mut s = String::new();
    for field in fields {
        match field {
            Field::Val(val) => s.push_str(&val.to_string()),
            Field::Comma => s.push('\t'),
            Field::Semicolon => {}
        }
    }
    match fields.last() {
        Some(Field::Comma) | Some(Field::Semicolon) => {}
        _ => s.push('\n'),
    }
    s
}

/// `"prompt";vars` to the prompt as shown and the variable list.
fn split_prompt(text: &str) -> (String, &str) {
    let text = text.trim();
    if let Some(quoted) = text.strip_prefix('"') {
        if let Some(end) = quoted.find('"') {
            let rest = quoted[end + 1..].trim_start();
            let rest = rest
                .strip_prefix(';')
                .or_else(|| rest.strip_prefix(','))
                .unwrap_or(rest);
            return (format!("{}? ", &quoted[..end]), rest);
        }
    }
    ("? ".to_string(), text)
}

fn color_value(n: i64) -> Result<u8> {
    u8::try_from(n).map_err(|_| error!(IllegalFunctionCall; "COLOR"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_prompt() {
        assert_eq!(split_prompt(r#""NAME";N$"#), ("NAME? ".to_string(), "N$"));
        assert_eq!(split_prompt("A,B"), ("? ".to_string(), "A,B"));
    }

    #[test]
    fn test_render_fields() {
        let fields = vec![Field::Val(Val::Number(1.0)), Field::Comma, Field::Val("x".into())];
        assert_eq!(render_fields(&fields), "1\tx\n");
        let fields = vec![Field::Val("x".into()), Field::Semicolon];
        assert_eq!(render_fields(&fields), "x");
    }
}
