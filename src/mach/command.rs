/// ## Statement keywords
///
/// The first word of a statement picks the handler. `?`, `@`, `'` and
/// `!` need no space after them, and the file handle forms are written
/// with `#` directly after the keyword.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Let,
    Dim,
    Print,
    If,
    Goto,
    For,
    Next,
    Gosub,
    Return,
    On,
    Input,
    Get,
    End,
    Rem,
    Data,
    Read,
    Restore,
    Def,
    Cls,
    Color,
    Locate,
    Open,
    PrintFile,
    InputFile,
    GetFile,
    SeekFile,
    Close,
    Sql,
    SaveState,
    LoadState,
    ClearState,
    States,
    Wait,
    Share,
    Label,
    Run,
    List,
    New,
    Renum,
    Delete,
    Find,
    Edit,
    Save,
    Load,
}

impl Command {
    /// Split a statement into its command and the operand text. `None`
    /// when the first word is no keyword.
    pub fn split(statement: &str) -> Option<(Command, &str)> {
        let statement = statement.trim();
        let first = statement.chars().next()?;
        let symbol = match first {
            '?' => Some(Command::Print),
            '@' => Some(Command::Sql),
            '\'' => Some(Command::Rem),
            '!' => Some(Command::Label),
            _ => None,
        };
        if let Some(command) = symbol {
            return Some((command, statement[1..].trim()));
        }
        let end = statement
            .find(|c: char| c.is_whitespace() || c == '#')
            .unwrap_or_else(|| statement.len());
        let (word, rest) = statement.split_at(end);
        let word = word.to_ascii_uppercase();
        if let Some(rest) = rest.trim_start().strip_prefix('#') {
            let command = match word.as_str() {
                "OPEN" => Command::Open,
                "PRINT" => Command::PrintFile,
                "INPUT" => Command::InputFile,
                "GET" => Command::GetFile,
                "SEEK" => Command::SeekFile,
                "CLOSE" => Command::Close,
                _ => return None,
            };
            return Some((command, rest.trim()));
        }
        let command = match word.as_str() {
            "LET" => Command::Let,
            "DIM" => Command::Dim,
            "PRINT" => Command::Print,
            "IF" => Command::If,
            "GOTO" => Command::Goto,
            "FOR" => Command::For,
            "NEXT" => Command::Next,
            "GOSUB" => Command::Gosub,
            "RETURN" => Command::Return,
            "ON" => Command::On,
            "INPUT" => Command::Input,
            "GET" => Command::Get,
            "END" => Command::End,
            "REM" => Command::Rem,
            "DATA" => Command::Data,
            "READ" => Command::Read,
            "RESTORE" => Command::Restore,
            "DEF" => Command::Def,
            "CLS" => Command::Cls,
            "COLOR" => Command::Color,
            "LOCATE" => Command::Locate,
            "CLOSE" => Command::Close,
            "SQL" => Command::Sql,
            "SAVESTATE" => Command::SaveState,
            "LOADSTATE" => Command::LoadState,
            "CLEARSTATE" => Command::ClearState,
            "STATES" => Command::States,
            "WAIT" => Command::Wait,
            "SHARE" => Command::Share,
            "RUN" => Command::Run,
            "LIST" => Command::List,
            "NEW" => Command::New,
            "RENUM" => Command::Renum,
            "DELETE" => Command::Delete,
            "FIND" => Command::Find,
            "EDIT" => Command::Edit,
            "SAVE" => Command::Save,
            "LOAD" => Command::Load,
            _ => return None,
        };
        Some((command, rest.trim()))
    }

    /// Editor commands. They act on the listing rather than on a run.
    pub fn is_editor(self) -> bool {
        use Command::*;
        matches!(
            self,
            Run | List | New | Renum | Delete | Find | Edit | Save | Load
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split() {
        assert_eq!(Command::split("print x"), Some((Command::Print, "x")));
        assert_eq!(Command::split("? x;"), Some((Command::Print, "x;")));
        assert_eq!(Command::split("PRINT#1, x"), Some((Command::PrintFile, "1, x")));
        assert_eq!(Command::split("close # 2"), Some((Command::Close, "2")));
        assert_eq!(Command::split("close"), Some((Command::Close, "")));
        assert_eq!(Command::split("@select 1"), Some((Command::Sql, "select 1")));
        assert_eq!(Command::split("!main"), Some((Command::Label, "main")));
        assert_eq!(Command::split("a=1"), None);
        assert_eq!(Command::split("printx"), None);
    }
}
