//! The command loop.

use crate::command::Command;
use crate::config::ReplConfig;
use crate::error::CliResult;
use layerkv_core::{CoreResult, StorageEngine};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use tracing::{debug, warn};

const HELP: &str = "
Welcome to layerkv!
Please use the following commands for input:

 * SET <key> <value>   : stores the value for the key
 * GET <key>           : returns the current value for the key
 * DELETE <key>        : removes the entry for the key
 * COUNT <value>       : returns the number of keys that have the given value
 * BEGIN               : starts a new transaction
 * COMMIT              : completes the current transaction
 * ROLLBACK            : reverts to a state prior to BEGIN call
 * HELP                : displays usage
 * EXIT                : gracefully stops the process and exits
";

/// What the loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading lines.
    Continue,
    /// `EXIT` was read.
    Exit,
}

/// Reads commands line by line and answers them against one engine.
pub struct Repl<W: Write> {
    engine: StorageEngine,
    config: ReplConfig,
    out: W,
}

impl<W: Write> Repl<W> {
    /// Creates a loop over `engine` writing answers to `out`.
    pub fn new(engine: StorageEngine, config: ReplConfig, out: W) -> Self {
        Self {
            engine,
            config,
            out,
        }
    }

    /// Returns the engine.
    pub fn engine(&self) -> &StorageEngine {
        &self.engine
    }

    /// Runs the interactive loop on the terminal until `EXIT`, Ctrl-D or
    /// end of input. Ctrl-C abandons the current line.
    pub fn run_interactive(&mut self) -> CliResult<Flow> {
        if self.config.show_banner {
            self.print_help()?;
        }

        let mut editor = DefaultEditor::new()?;
        let prompt = self.config.prompt.clone().unwrap_or_default();
        loop {
            match editor.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = editor.add_history_entry(line.as_str());
                    }
                    if self.process_line(&line)? == Flow::Exit {
                        return Ok(Flow::Exit);
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => return Ok(Flow::Continue),
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Runs the loop over piped `input` until `EXIT` or end of input.
    pub fn run_pipe<R: BufRead>(&mut self, input: R) -> CliResult<Flow> {
        if self.config.show_banner {
            self.print_help()?;
        }
        self.run_lines(input)
    }

    /// Runs every line of a script file.
    ///
    /// Stops early, returning [`Flow::Exit`], if the script contains `EXIT`.
    pub fn run_script(&mut self, path: &Path) -> CliResult<Flow> {
        debug!("Running script {:?}", path);

        let file = File::open(path)?;
        self.run_lines(BufReader::new(file))
    }

    /// Bytes that are not UTF-8 are replaced rather than rejected, so a
    /// bad line is still answered and never ends the loop.
    fn run_lines<R: BufRead>(&mut self, mut input: R) -> CliResult<Flow> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                return Ok(Flow::Continue);
            }
            let line = String::from_utf8_lossy(&buf);
            if self.process_line(&line)? == Flow::Exit {
                return Ok(Flow::Exit);
            }
        }
    }

    /// Executes one line, reporting any failure on the output.
    ///
    /// Usage mistakes print `WARNING: ...`, other faults print
    /// `ERROR: ...`; both keep the loop going. Only a failure to write
    /// the report itself is returned.
    pub fn process_line(&mut self, line: &str) -> CliResult<Flow> {
        match self.execute(line) {
            Ok(flow) => Ok(flow),
            Err(err) if err.is_usage() => {
                writeln!(self.out, "WARNING: {err}")?;
                Ok(Flow::Continue)
            }
            Err(err) => {
                warn!("command failed: {err}");
                writeln!(self.out, "ERROR: {err}")?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Executes one line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line is malformed or output fails.
    pub fn execute(&mut self, line: &str) -> CliResult<Flow> {
        let Some(command) = Command::parse(line)? else {
            return Ok(Flow::Continue);
        };
        if self.config.echo_commands {
            writeln!(self.out, "> {}", line.trim())?;
        }

        match command {
            Command::Set { key, value } => apply_write(&mut self.engine, &key, Some(&value)),
            Command::Get { key } => match self.engine.get(&key) {
                Some(value) => writeln!(self.out, "{value}")?,
                None => writeln!(self.out, "key not set")?,
            },
            Command::Delete { key } => apply_write(&mut self.engine, &key, None),
            Command::Count { value } => {
                let count = self.engine.count(&value);
                writeln!(self.out, "{count}")?;
            }
            Command::Begin => {
                self.engine.begin();
            }
            Command::Commit => {
                let result = self.engine.commit();
                self.report_close(result)?;
            }
            Command::Rollback => {
                let result = self.engine.rollback();
                self.report_close(result)?;
            }
            Command::Help => self.print_help()?,
            Command::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    fn report_close(&mut self, result: CoreResult<()>) -> CliResult<()> {
        if let Err(err) = result {
            writeln!(self.out, "{err}")?;
        }
        Ok(())
    }

    fn print_help(&mut self) -> CliResult<()> {
        writeln!(self.out, "{HELP}")?;
        Ok(())
    }
}

/// Applies a write in the single-method form: an absent value removes the
/// key.
fn apply_write(engine: &mut StorageEngine, key: &str, value: Option<&str>) {
    match value {
        Some(value) => engine.put(key, value),
        None => engine.remove(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use layerkv_core::KeyValueStore;
    use std::io::Cursor;
    use tempfile::NamedTempFile;

    fn quiet_repl() -> Repl<Vec<u8>> {
        let config = ReplConfig::new().show_banner(false);
        Repl::new(StorageEngine::in_memory(), config, Vec::new())
    }

    /// Runs `input` through a fresh loop and returns the printed lines.
    fn transcript(input: &str) -> Vec<String> {
        let mut repl = quiet_repl();
        repl.run_pipe(Cursor::new(input.to_owned())).unwrap();
        String::from_utf8(repl.out)
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn set_and_get_value() {
        assert_eq!(transcript("SET foo 123\nGET foo\n"), vec!["123"]);
    }

    #[test]
    fn delete_a_value() {
        assert_eq!(transcript("DELETE foo\nGET foo\n"), vec!["key not set"]);
    }

    #[test]
    fn count_occurrences() {
        let input = "SET foo 123\nSET bar 456\nSET baz 123\nCOUNT 123\nCOUNT 456\n";
        assert_eq!(transcript(input), vec!["2", "1"]);
    }

    #[test]
    fn commit_a_transaction() {
        let input = "SET bar 123\nGET bar\nBEGIN\nSET foo 456\nGET bar\nDELETE bar\n\
                     COMMIT\nGET bar\nROLLBACK\nGET foo\n";
        assert_eq!(
            transcript(input),
            vec!["123", "123", "key not set", "no transaction", "456"]
        );
    }

    #[test]
    fn rollback_a_transaction() {
        let input = "SET foo 123\nSET bar abc\nBEGIN\nSET foo 456\nGET foo\nSET bar def\n\
                     GET bar\nROLLBACK\nGET foo\nGET bar\nCOMMIT\n";
        assert_eq!(
            transcript(input),
            vec!["456", "def", "123", "abc", "no transaction"]
        );
    }

    #[test]
    fn nested_transactions() {
        let input = "SET foo 123\nSET bar 456\nBEGIN\nSET foo 456\nBEGIN\nCOUNT 456\nGET foo\n\
                     SET foo 789\nGET foo\nCOUNT 456\nROLLBACK\nGET foo\nCOUNT 456\n\
                     DELETE foo\nGET foo\nROLLBACK\nGET foo\n";
        assert_eq!(
            transcript(input),
            vec!["2", "456", "789", "1", "456", "2", "key not set", "123"]
        );
    }

    #[test]
    fn blank_and_unknown_lines_are_silent() {
        assert_eq!(transcript("\n   \nFROB x\nGET x\n"), vec!["key not set"]);
    }

    #[test]
    fn missing_argument_warns_and_continues() {
        let output = transcript("SET foo\nSET foo 1\nGET foo\n");
        assert_eq!(
            output,
            vec!["WARNING: SET expects <key> <value>", "1"]
        );
    }

    #[test]
    fn exit_stops_the_loop() {
        let mut repl = quiet_repl();
        let flow = repl
            .run_pipe(Cursor::new("SET a 1\nexit\nGET a\n".to_owned()))
            .unwrap();

        assert_eq!(flow, Flow::Exit);
        assert!(repl.out.is_empty());
        assert_eq!(repl.engine().get("a").as_deref(), Some("1"));
    }

    #[test]
    fn banner_is_printed_first() {
        let config = ReplConfig::new().prompt("> ");
        let mut repl = Repl::new(StorageEngine::in_memory(), config, Vec::new());
        repl.run_pipe(Cursor::new("GET a\n".to_owned())).unwrap();

        let output = String::from_utf8(repl.out).unwrap();
        assert!(output.trim_start().starts_with("Welcome to layerkv!"));
        assert!(output.ends_with("exits\n\nkey not set\n"));
    }

    #[test]
    fn invalid_utf8_line_does_not_stop_the_loop() {
        let mut repl = quiet_repl();
        let input = b"SET a 1\nSET \xff\xfe x\nGET a\nGET \xff\xfe\n".to_vec();
        let flow = repl.run_pipe(Cursor::new(input)).unwrap();

        assert_eq!(flow, Flow::Continue);
        assert_eq!(String::from_utf8(repl.out).unwrap(), "1\nx\n");
    }

    #[test]
    fn crlf_line_endings() {
        assert_eq!(transcript("SET foo 1\r\nGET foo\r\n"), vec!["1"]);
    }

    #[test]
    fn script_with_invalid_utf8_runs_to_the_end() {
        let mut script = NamedTempFile::new().unwrap();
        script.write_all(b"SET \xc3 1\nSET b 2\nCOUNT 1\nGET b\n").unwrap();

        let mut repl = quiet_repl();
        assert_eq!(repl.run_script(script.path()).unwrap(), Flow::Continue);
        assert_eq!(String::from_utf8(repl.out).unwrap(), "1\n2\n");
    }

    #[test]
    fn echo_commands() {
        let config = ReplConfig::new().show_banner(false).echo_commands(true);
        let mut repl = Repl::new(StorageEngine::in_memory(), config, Vec::new());
        repl.run_pipe(Cursor::new("  get a \n".to_owned())).unwrap();

        let output = String::from_utf8(repl.out).unwrap();
        assert_eq!(output, "> get a\nkey not set\n");
    }

    #[test]
    fn run_script_file() {
        let mut script = NamedTempFile::new().unwrap();
        writeln!(script, "SET foo 123").unwrap();
        writeln!(script, "BEGIN").unwrap();
        writeln!(script, "SET foo 456").unwrap();
        writeln!(script, "COMMIT").unwrap();
        writeln!(script, "GET foo").unwrap();

        let mut repl = quiet_repl();
        let flow = repl.run_script(script.path()).unwrap();

        assert_eq!(flow, Flow::Continue);
        assert_eq!(String::from_utf8(repl.out.clone()).unwrap(), "456\n");
        assert_eq!(repl.engine().store().size(), 1);
    }

    #[test]
    fn run_script_stops_at_exit() {
        let mut script = NamedTempFile::new().unwrap();
        writeln!(script, "SET foo 1\nEXIT\nSET foo 2").unwrap();

        let mut repl = quiet_repl();
        assert_eq!(repl.run_script(script.path()).unwrap(), Flow::Exit);
        assert_eq!(repl.engine().get("foo").as_deref(), Some("1"));
    }

    #[test]
    fn missing_script_is_an_io_error() {
        let mut repl = quiet_repl();
        let err = repl
            .run_script(Path::new("/definitely/not/here.kv"))
            .unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
