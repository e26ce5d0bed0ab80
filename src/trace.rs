use std::collections::VecDeque;

use crate::{Error, Result};

#[derive(Debug)]
pub(crate) struct TraceState {
    pub(crate) enabled: bool,
    pub(crate) events: bool,
    pub(crate) logs: VecDeque<String>,
    pub(crate) log_limit: usize,
    pub(crate) to_stderr: bool,
}

impl Default for TraceState {
    fn default() -> Self {
        Self {
            enabled: false,
            events: true,
            logs: VecDeque::new(),
            log_limit: 10_000,
            to_stderr: true,
        }
    }
}

impl TraceState {
    pub(crate) fn set_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::InvalidConfig(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.log_limit = max_entries;
        while self.logs.len() > self.log_limit {
            self.logs.pop_front();
        }
        Ok(())
    }

    pub(crate) fn event_line(&mut self, line: String) {
        if self.enabled && self.events {
            self.line(line);
        }
    }

    pub(crate) fn line(&mut self, line: String) {
        if !self.enabled {
            return;
        }
        if self.to_stderr {
            eprintln!("{line}");
        }
        if self.logs.len() >= self.log_limit {
            self.logs.pop_front();
        }
        self.logs.push_back(line);
    }

    pub(crate) fn take(&mut self) -> Vec<String> {
        self.logs.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> TraceState {
        TraceState {
            enabled: true,
            to_stderr: false,
            ..TraceState::default()
        }
    }

    #[test]
    fn disabled_trace_records_nothing() {
        let mut trace = TraceState::default();
        trace.line("[wizard] render step=0".into());
        assert!(trace.take().is_empty());
    }

    #[test]
    fn limit_keeps_newest_lines() -> Result<()> {
        let mut trace = quiet();
        for n in 0..5 {
            trace.line(format!("line {n}"));
        }
        trace.set_log_limit(2)?;
        assert_eq!(trace.take(), vec!["line 3", "line 4"]);

        trace.line("a".into());
        trace.line("b".into());
        trace.line("c".into());
        assert_eq!(trace.take(), vec!["b", "c"]);
        assert!(matches!(trace.set_log_limit(0), Err(Error::InvalidConfig(_))));
        Ok(())
    }

    #[test]
    fn event_lines_follow_their_switch() {
        let mut trace = quiet();
        trace.events = false;
        trace.event_line("[event] click".into());
        trace.line("[wizard] advance".into());
        assert_eq!(trace.take(), vec!["[wizard] advance"]);
    }
}
