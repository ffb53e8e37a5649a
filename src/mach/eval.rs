use super::{Catalog, Config, Environment, Function, Operation, Subscript, Val, WordList};
use crate::error;
use crate::lang::{
    ast::{Expression, Item},
    name, parse, parse_list, Error,
};
use std::collections::HashMap;
use std::time::{Duration, Instant};

type Result<T> = std::result::Result<T, Error>;

/// Nodes evaluated inside one another, across user function calls.
const MAX_DEPTH: usize = 256;

/// One evaluated entry of a PRINT style list.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Val(Val),
    Comma,
    Semicolon,
}

/// ## Expression evaluator
///
/// Walks the syntax tree produced by `lang::parse`. Every public entry
/// point is one top-level evaluation with its own deadline.
///
/// An identifier with no value passes through as its own text when it
/// stands alone. As the operand of an operator it takes the default
/// value for its name instead.

pub struct Evaluator<'a> {
    env: &'a Environment,
    catalog: &'a Catalog<'a>,
    words: &'a WordList,
    timeout: Duration,
    max_fn_depth: usize,
    started: Instant,
    params: Vec<HashMap<String, Val>>,
    depth: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        env: &'a Environment,
        catalog: &'a Catalog<'a>,
        words: &'a WordList,
        config: &Config,
    ) -> Evaluator<'a> {
        Evaluator {
            env,
            catalog,
            words,
            timeout: config.expression_timeout,
            max_fn_depth: config.max_fn_depth,
            started: Instant::now(),
            params: vec![],
            depth: 0,
        }
    }

    /// Evaluate text holding one expression.
    pub fn expression(&mut self, text: &str) -> Result<Val> {
        let expr = parse(text)?;
        self.value(&expr)
    }

    /// Evaluate an already parsed expression.
    pub fn value(&mut self, expr: &Expression) -> Result<Val> {
        self.start();
        self.eval(expr, false)
    }

    /// Evaluate a separator delimited list.
    pub fn list(&mut self, text: &str) -> Result<Vec<Field>> {
        let items = parse_list(text)?;
        self.start();
        let mut fields = Vec::with_capacity(items.len());
        for item in &items {
            fields.push(match item {
                Item::Expression(expr) => Field::Val(self.eval(expr, false)?),
                Item::Comma(_) => Field::Comma,
                Item::Semicolon(_) => Field::Semicolon,
            });
        }
        Ok(fields)
    }

    /// Evaluate a list into one line of text. Strings keep their quotes,
    /// commas become tabs and semicolons vanish.
    pub fn text(&mut self, text: &str) -> Result<String> {
        let mut s = String::new();
        for field in self.list(text)? {
            match field {
                Field::Val(val) => s.push_str(&val.render()),
                Field::Comma => s.push('\t'),
                Field::Semicolon => {}
            }
        }
        Ok(s)
    }

    /// Evaluate array indices.
    pub fn subscripts(&mut self, args: &[Expression]) -> Result<Vec<Subscript>> {
        self.start();
        self.indices(args)
    }

    /// Evaluate as an integer, the form every line number, loop bound
    /// and count takes.
    pub fn integer(&mut self, text: &str) -> Result<i64> {
        let val = self.expression(text)?;
        match val {
            Val::Number(n) if n.fract() == 0.0 && n.abs() < 1e16 => Ok(n as i64),
            Val::Number(_) => Err(error!(IllegalFunctionCall; "INTEGER REQUIRED")),
            Val::Text(_) => Err(error!(TypeMismatch)),
        }
    }

    fn start(&mut self) {
        self.started = Instant::now();
        self.params.clear();
        self.depth = 0;
    }

    fn check_timeout(&self) -> Result<()> {
        if self.started.elapsed() >= self.timeout {
            Err(error!(ExpressionTimeout))
        } else {
            Ok(())
        }
    }

    fn resolve(&self, var_name: &str) -> Option<Val> {
        if let Some(params) = self.params.last() {
            if let Some(val) = params.get(&name::normalize(var_name)) {
                return Some(val.clone());
            }
        }
        if let Some(val) = self.catalog.get(var_name) {
            return Some(val);
        }
        self.env.get(var_name).cloned()
    }

    fn eval(&mut self, expr: &Expression, operand: bool) -> Result<Val> {
        self.check_timeout()?;
        if self.depth >= MAX_DEPTH {
            return Err(error!(FormulaTooComplex));
        }
        self.depth += 1;
        let result = self.node(expr, operand);
        self.depth -= 1;
        result
    }

    fn node(&mut self, expr: &Expression, operand: bool) -> Result<Val> {
        use Expression::*;
        match expr {
            Number(_, n) => Ok(Val::Number(*n)),
            String(_, s) => Ok(Val::Text(s.clone())),
            Var(_, var_name) => match self.resolve(var_name) {
                Some(val) => Ok(val),
                None if operand => Ok(Val::default_for(var_name)),
                None => Ok(Val::Text(var_name.clone())),
            },
            Call(_, call_name, args) => self.call(call_name, args, operand),
            Negation(_, expr) => Operation::negate(self.eval(expr, true)?),
            Not(_, expr) => Operation::not(self.eval(expr, true)?),
            Multiply(_, l, r) => self.binary(l, r, Operation::multiply),
            Divide(_, l, r) => self.binary(l, r, Operation::divide),
            Modulus(_, l, r) => self.binary(l, r, Operation::modulus),
            Add(_, l, r) => self.binary(l, r, Operation::sum),
            Subtract(_, l, r) => self.binary(l, r, Operation::subtract),
            Equal(_, l, r) => self.binary(l, r, Operation::equal),
            NotEqual(_, l, r) => self.binary(l, r, Operation::not_equal),
            Less(_, l, r) => self.binary(l, r, Operation::less),
            LessEqual(_, l, r) => self.binary(l, r, Operation::less_equal),
            Greater(_, l, r) => self.binary(l, r, Operation::greater),
            GreaterEqual(_, l, r) => self.binary(l, r, Operation::greater_equal),
            And(_, l, r) => self.binary(l, r, Operation::and),
            Or(_, l, r) => self.binary(l, r, Operation::or),
        }
    }

    fn binary(
        &mut self,
        lhs: &Expression,
        rhs: &Expression,
        op: fn(Val, Val) -> Result<Val>,
    ) -> Result<Val> {
        let lhs = self.eval(lhs, true)?;
        let rhs = self.eval(rhs, true)?;
        op(lhs, rhs)
    }

    fn call(&mut self, call_name: &str, args: &[Expression], operand: bool) -> Result<Val> {
        let upper = name::normalize(call_name);
        if Function::is_builtin(&upper) {
            let mut vals = Vec::with_capacity(args.len());
            for arg in args {
                vals.push(self.eval(arg, false)?);
            }
            return Function::call(&upper, &vals, self.words);
        }
        if upper.starts_with("FN") {
            return self.user_function(&upper, args);
        }
        let index = self.indices(args)?;
        match self.env.get_element(&upper, &index) {
            Some(val) => Ok(val.clone()),
            None if operand => Ok(Val::default_for(&upper)),
            None => {
                let index: Vec<String> = index.iter().map(|s| s.to_string()).collect();
                Ok(Val::Text(format!("{}({})", call_name, index.join(","))))
            }
        }
    }

    fn indices(&mut self, args: &[Expression]) -> Result<Vec<Subscript>> {
        let mut index = Vec::with_capacity(args.len());
        for arg in args {
            index.push(Subscript::from(&self.eval(arg, true)?));
        }
        Ok(index)
    }

    fn user_function(&mut self, fn_name: &str, args: &[Expression]) -> Result<Val> {
        let env = self.env;
        let function = match env.function(fn_name) {
            Some(f) => f,
            None => return Err(error!(UndefinedUserFunction; fn_name.to_string())),
        };
        if function.params.len() != args.len() {
            return Err(error!(IllegalFunctionCall; fn_name.to_string()));
        }
        if self.params.len() >= self.max_fn_depth {
            return Err(error!(FormulaTooComplex; fn_name.to_string()));
        }
        let mut params = HashMap::new();
        for (param, arg) in function.params.iter().zip(args) {
            params.insert(param.clone(), self.eval(arg, false)?);
        }
        self.params.push(params);
        let result = self.eval(&function.body, false);
        self.params.pop();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mach::{Session, UserFunction};

    fn eval_with(env: &Environment, config: &Config, text: &str) -> Result<Val> {
        let session = Session::default();
        let catalog = Catalog {
            session: &session,
            rows: 24,
            cols: 80,
            fg: 7,
            bg: 0,
            key: None,
            ticks: 0,
        };
        let words = WordList::default();
        let mut e = Evaluator::new(env, &catalog, &words, config);
        e.expression(text)
    }

    fn eval(env: &Environment, text: &str) -> Val {
        eval_with(env, &Config::default(), text).unwrap()
    }

    #[test]
    fn test_literals_are_idempotent() {
        let env = Environment::new();
        assert_eq!(eval(&env, "42"), Val::Number(42.0));
        assert_eq!(eval(&env, "42").render(), "42");
        assert_eq!(eval(&env, r#""hi""#).render(), r#""hi""#);
    }

    #[test]
    fn test_precedence() {
        let env = Environment::new();
        assert_eq!(eval(&env, "2+3*4"), Val::Number(14.0));
        assert_eq!(eval(&env, "(2+3)*4"), Val::Number(20.0));
        assert_eq!(eval(&env, "10-4-3"), Val::Number(3.0));
        assert_eq!(eval(&env, "1<2 AND 2<3"), Val::Number(1.0));
        assert_eq!(eval(&env, "NOT 1=2"), Val::Number(1.0));
    }

    #[test]
    fn test_string_concatenation() {
        let mut env = Environment::new();
        env.set("A$", Val::Text("foo".into())).unwrap();
        assert_eq!(eval(&env, r#"A$+"bar""#).render(), r#""foobar""#);
    }

    #[test]
    fn test_string_relations() {
        let env = Environment::new();
        assert_eq!(eval(&env, r#""ab"="ab""#), Val::Number(1.0));
        assert_eq!(eval(&env, r#""ab"="ac""#), Val::Number(0.0));
        assert_eq!(eval(&env, r#""ab"<>"ac""#), Val::Number(1.0));
    }

    #[test]
    fn test_undefined_passes_through() {
        let env = Environment::new();
        assert_eq!(eval(&env, "hello"), Val::Text("hello".into()));
        assert_eq!(eval(&env, "X+1"), Val::Number(1.0));
        assert_eq!(eval(&env, r#"Y$+"!""#), Val::Text("!".into()));
        assert_eq!(eval(&env, "A(1,2)"), Val::Text("A(1,2)".into()));
    }

    #[test]
    fn test_array_element() {
        let mut env = Environment::new();
        env.dimension("A", &[2, 3]).unwrap();
        env.set_element("A", vec![Subscript::Int(1), Subscript::Int(2)], Val::Number(9.0))
            .unwrap();
        assert_eq!(eval(&env, "A(1,1+1)*2"), Val::Number(18.0));
        assert_eq!(eval(&env, "A(0,0)"), Val::Number(0.0));
    }

    #[test]
    fn test_user_function() {
        let mut env = Environment::new();
        env.define(UserFunction {
            name: "FNSQ".into(),
            params: vec!["X".into()],
            body: parse("X*X").unwrap(),
        });
        assert_eq!(eval(&env, "FNSQ(4)+1"), Val::Number(17.0));
        let e = eval_with(&env, &Config::default(), "FNNO(1)").unwrap_err();
        assert_eq!(e.to_string(), "UNDEFINED USER FUNCTION; FNNO");
    }

    #[test]
    fn test_runaway_recursion() {
        let mut env = Environment::new();
        env.define(UserFunction {
            name: "FNR".into(),
            params: vec!["X".into()],
            body: parse("FNR(X)").unwrap(),
        });
        let e = eval_with(&env, &Config::default(), "FNR(1)").unwrap_err();
        assert!(e.is(crate::lang::ErrorCode::FormulaTooComplex));
    }

    #[test]
    fn test_nested_bodies_are_bounded() {
        let mut env = Environment::new();
        for (name, next) in &[("FNA", "FNB(X)"), ("FNB", "FNC(X)"), ("FNC", "FND(X)"), ("FND", "X")] {
            env.define(UserFunction {
                name: name.to_string(),
                params: vec!["X".into()],
                body: parse(&format!("{}{}", "-".repeat(90), next)).unwrap(),
            });
        }
        assert_eq!(eval(&env, "FNC(3)"), Val::Number(3.0));
        let e = eval_with(&env, &Config::default(), "FNA(1)").unwrap_err();
        assert!(e.is(crate::lang::ErrorCode::FormulaTooComplex));
    }

    #[test]
    fn test_timeout() {
        let mut env = Environment::new();
        for i in 0..30 {
            let next = format!("FNF{}", i + 1);
            env.define(UserFunction {
                name: format!("FNF{}", i),
                params: vec!["X".into()],
                body: parse(&format!("{}(X)+{}(X)", next, next)).unwrap(),
            });
        }
        env.define(UserFunction {
            name: "FNF30".into(),
            params: vec!["X".into()],
            body: parse("X").unwrap(),
        });
        let config = Config {
            expression_timeout: Duration::from_millis(50),
            ..Config::default()
        };
        let e = eval_with(&env, &config, "FNF0(1)").unwrap_err();
        assert_eq!(e.to_string(), "EXPRESSION TIMEOUT");
        assert_eq!(eval(&env, "FNF29(1)"), Val::Number(2.0));
    }

    #[test]
    fn test_text_form() {
        let mut env = Environment::new();
        env.set("N", Val::Number(3.0)).unwrap();
        let session = Session::default();
        let catalog = Catalog {
            session: &session,
            rows: 24,
            cols: 80,
            fg: 7,
            bg: 0,
            key: None,
            ticks: 0,
        };
        let words = WordList::default();
        let config = Config::default();
        let mut e = Evaluator::new(&env, &catalog, &words, &config);
        assert_eq!(e.text(r#""a";N,"b""#).unwrap(), "\"a\"3\t\"b\"");
        assert_eq!(e.text("LEFT$(\"HELLO\",3)").unwrap(), "\"HEL\"");
    }
}
