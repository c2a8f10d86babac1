//! Verlauf der dispatchten Commands, je Eintrag mit betroffenem Dokument und Ergebnis.

use super::AppCommand;
use crate::core::FileKey;
use std::collections::VecDeque;

/// Ein protokollierter Command.
#[derive(Debug, Clone)]
pub struct CommandRecord {
    pub command: AppCommand,
    /// Aktives Dokument beim Dispatch (`None` ohne Workspace)
    pub document: Option<FileKey>,
    pub succeeded: bool,
}

/// Ringpuffer der letzten Commands für Diagnose und Fehlerberichte.
#[derive(Debug)]
pub struct CommandLog {
    records: VecDeque<CommandRecord>,
    capacity: usize,
}

impl Default for CommandLog {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl CommandLog {
    const DEFAULT_CAPACITY: usize = 1000;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    /// Hängt einen Eintrag an; bei voller Kapazität fällt der älteste heraus.
    pub fn record(&mut self, command: AppCommand, document: Option<FileKey>, succeeded: bool) {
        if self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        if !succeeded {
            log::debug!("Command fehlgeschlagen: {:?}", command);
        }
        self.records.push_back(CommandRecord {
            command,
            document,
            succeeded,
        });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Alle Einträge, ältester zuerst.
    pub fn records(&self) -> impl DoubleEndedIterator<Item = &CommandRecord> + '_ {
        self.records.iter()
    }

    /// Einträge, die bei aktivem `key` dispatcht wurden.
    pub fn records_for<'a>(&'a self, key: &'a FileKey) -> impl Iterator<Item = &'a CommandRecord> + 'a {
        self.records
            .iter()
            .filter(move |record| record.document.as_ref() == Some(key))
    }

    pub fn last_failure(&self) -> Option<&CommandRecord> {
        self.records().rev().find(|record| !record.succeeded)
    }
}
