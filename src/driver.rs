// src/driver.rs

//! Line-driven front end for [`SupplierView`]: commands come in as text
//! lines, rendered HTML fragments go out.
//!
//! The view is only touched from the loop in [`Driver::run`]. Fetches run on
//! their own tasks and report back over a channel.

use std::{io::Write, sync::Arc};
use tokio::{io::{AsyncBufRead, AsyncBufReadExt}, sync::mpsc};
use tracing::{debug, info};
//
use crate::{
    catalog::SupplierCatalog,
    error::Result,
    source::SupplierSource,
    supplier::Supplier,
    view::{Dispatched, FetchTicket, SupplierView, ViewEvent},
};

type Loaded = (FetchTicket, Result<Vec<Supplier>>);

pub const HELP: &str = "\
commands:
  frameworks          list frameworks (catalog mode)
  select <framework>  load the suppliers for a framework
  click <n>           show details for the n-th supplier
  show                print the list and the details panel
  quit";

#[derive(Debug, PartialEq)]
pub enum Command {
    Frameworks,
    Select(String),
    Click(usize),
    Show,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match word {
            "frameworks" => Command::Frameworks,
            "select" if !rest.is_empty() => Command::Select(rest.to_string()),
            "click" => match rest.parse() {
                Ok(n) => Command::Click(n),
                Err(_) => Command::Unknown(line.to_string()),
            },
            "show" => Command::Show,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        };

        Some(command)
    }
}

fn spawn_fetch(source: Arc<dyn SupplierSource>, ticket: FetchTicket, tx: mpsc::UnboundedSender<Loaded>) {
    tokio::spawn(async move {
        let outcome = source.fetch(&ticket.framework).await;
        // receiver only goes away on shutdown
        let _ = tx.send((ticket, outcome));
    });
}

pub struct Driver {
    source: Arc<dyn SupplierSource>,
    catalog: Option<Arc<SupplierCatalog>>,
    view: SupplierView,
}

impl Driver {
    pub fn new(source: Arc<dyn SupplierSource>) -> Self {
        Self {
            source,
            catalog: None,
            view: SupplierView::new(),
        }
    }

    /// Serves suppliers from `catalog`, which also knows the framework list.
    pub fn with_catalog(catalog: Arc<SupplierCatalog>) -> Self {
        Self {
            source: catalog.clone(),
            catalog: Some(catalog),
            view: SupplierView::new(),
        }
    }

    pub fn view(&self) -> &SupplierView {
        &self.view
    }

    /// Page load: selects the first known framework and renders its
    /// suppliers before any command is read. Does nothing without a catalog.
    pub async fn load_initial<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let first = self
            .catalog
            .as_ref()
            .and_then(|catalog| catalog.frameworks().next().map(str::to_string));
        let Some(first) = first else {
            return Ok(());
        };

        let ticket = self.view.on_framework_change(&first);
        let outcome = self.source.fetch(&ticket.framework).await;
        self.view.apply_fetch(&ticket, outcome);

        self.print_view(out)
    }

    /// Runs until `quit`, or until input ends and every pending fetch has
    /// reported back. Returns the final view.
    pub async fn run<R, W>(mut self, input: R, out: &mut W) -> Result<SupplierView>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<Loaded>();
        let mut lines = input.lines();
        let mut input_open = true;
        let mut in_flight = 0usize;

        while input_open || in_flight > 0 {
            tokio::select! {
                line = lines.next_line(), if input_open => {
                    let Some(line) = line? else {
                        debug!(in_flight, "input closed");
                        input_open = false;
                        continue;
                    };

                    match Command::parse(&line) {
                        None => {}
                        Some(Command::Quit) => break,
                        Some(Command::Select(framework)) => {
                            if let Dispatched::Fetch(ticket) = self.view.dispatch(ViewEvent::FrameworkChanged(framework))? {
                                spawn_fetch(self.source.clone(), ticket, tx.clone());
                                in_flight += 1;
                            }
                            writeln!(out, "{}", self.view.panel_html())?;
                        }
                        Some(command) => self.handle(command, out)?,
                    }
                }
                Some((ticket, outcome)) = rx.recv() => {
                    in_flight -= 1;
                    if let Dispatched::Applied(applied) = self.view.dispatch(ViewEvent::SuppliersLoaded { ticket, outcome })? {
                        info!(?applied, "fetch completed");
                    }
                    self.print_view(out)?;
                }
            }
        }

        Ok(self.view)
    }

    fn handle<W: Write>(&mut self, command: Command, out: &mut W) -> Result<()> {
        match command {
            Command::Frameworks => match &self.catalog {
                Some(catalog) => {
                    for framework in catalog.frameworks() {
                        writeln!(out, "{}", framework)?;
                    }
                }
                None => writeln!(out, "framework list is only available with SUPPLIERS_CSV")?,
            },
            Command::Click(position) => match self.view.box_at(position) {
                Some(id) => {
                    self.view.dispatch(ViewEvent::BoxClicked(id))?;
                    writeln!(out, "{}", self.view.panel_html())?;
                }
                None => writeln!(out, "no supplier at position {}", position)?,
            },
            Command::Show => self.print_view(out)?,
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Unknown(text) => writeln!(out, "unknown command {:?}, try help", text)?,
            // handled by the loop
            Command::Select(_) | Command::Quit => {}
        }

        Ok(())
    }

    fn print_view<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "{}", self.view.container_html())?;
        writeln!(out, "{}", self.view.panel_html())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("   "), None);
        assert_eq!(Command::parse("select RM 6187 Lot 2"), Some(Command::Select("RM 6187 Lot 2".into())));
        assert_eq!(Command::parse("click 3"), Some(Command::Click(3)));
        assert_eq!(Command::parse("click x"), Some(Command::Unknown("click x".into())));
        assert_eq!(Command::parse("select"), Some(Command::Unknown("select".into())));
        assert_eq!(Command::parse("exit"), Some(Command::Quit));
    }
}
