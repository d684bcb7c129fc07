// src/view.rs

//! Supplier list and details panel state.
//!
//! The view owns no I/O. A framework change hands back a [`FetchTicket`];
//! whoever performs the request returns the outcome through
//! [`SupplierView::apply_fetch`]. Only the most recently issued ticket can
//! change what is rendered.

use std::{collections::BTreeMap, fmt};
use tracing::{debug, info, warn};
//
use crate::{
    details::{escape_html, render_details, DetailsView},
    error::{Result, ViewError},
    supplier::Supplier,
};

/// Identifier of one rendered supplier box. Never reused within a view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoxId(u64);

impl BoxId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle for one framework fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub framework: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SupplierBox {
    pub id: BoxId,
    pub name: String,
    pub color: String,
}

impl SupplierBox {
    pub fn to_html(&self) -> String {
        format!(
            "<div class=\"supplier-box {}\" data-box-id=\"{}\">{}</div>",
            escape_html(&self.color),
            self.id,
            escape_html(&self.name)
        )
    }
}

pub fn render_supplier_box(id: BoxId, supplier: &Supplier) -> SupplierBox {
    SupplierBox {
        id,
        name: supplier.name.clone(),
        color: supplier.color.clone(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Panel {
    Hidden,
    Visible { id: BoxId, details: DetailsView },
    Failed(String),
}

/// What happened to a fetch outcome handed to [`SupplierView::apply_fetch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    Rendered(usize),
    Failed,
    Stale,
}

/// Inputs the view reacts to.
#[derive(Debug)]
pub enum ViewEvent {
    FrameworkChanged(String),
    SuppliersLoaded {
        ticket: FetchTicket,
        outcome: Result<Vec<Supplier>>,
    },
    BoxClicked(BoxId),
}

/// What a dispatched event produced.
#[derive(Debug, PartialEq)]
pub enum Dispatched {
    Fetch(FetchTicket),
    Applied(Applied),
    Shown(BoxId),
}

#[derive(Debug)]
pub struct SupplierView {
    boxes: BTreeMap<BoxId, (SupplierBox, Supplier)>,
    panel: Panel,
    framework: Option<String>,
    next_box: u64,
    latest_seq: u64,
}

impl Default for SupplierView {
    fn default() -> Self {
        Self::new()
    }
}

impl SupplierView {
    pub fn new() -> Self {
        Self {
            boxes: BTreeMap::new(),
            panel: Panel::Hidden,
            framework: None,
            next_box: 0,
            latest_seq: 0,
        }
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn framework(&self) -> Option<&str> {
        self.framework.as_deref()
    }

    /// Rendered boxes in list order.
    pub fn boxes(&self) -> impl Iterator<Item = &SupplierBox> {
        self.boxes.values().map(|(b, _)| b)
    }

    pub fn supplier(&self, id: BoxId) -> Option<&Supplier> {
        self.boxes.get(&id).map(|(_, s)| s)
    }

    /// Hides the panel and issues a ticket for fetching `selected`.
    ///
    /// The value is taken as-is; encoding it for the request is the
    /// source's job.
    pub fn on_framework_change(&mut self, selected: &str) -> FetchTicket {
        self.latest_seq += 1;
        self.panel = Panel::Hidden;
        self.framework = Some(selected.to_string());

        info!(framework = selected, seq = self.latest_seq, "framework selected");

        FetchTicket {
            seq: self.latest_seq,
            framework: selected.to_string(),
        }
    }

    pub fn apply_fetch(&mut self, ticket: &FetchTicket, outcome: Result<Vec<Supplier>>) -> Applied {
        if ticket.seq != self.latest_seq {
            match &outcome {
                Ok(suppliers) => debug!(framework = %ticket.framework, seq = ticket.seq, count = suppliers.len(), "discarding stale supplier list"),
                Err(err) => debug!(framework = %ticket.framework, seq = ticket.seq, error = %err, "discarding stale fetch failure"),
            }
            return Applied::Stale;
        }

        match outcome {
            Ok(suppliers) => {
                let count = suppliers.len();
                self.replace_boxes(suppliers);
                info!(framework = %ticket.framework, count, "suppliers rendered");
                Applied::Rendered(count)
            }
            Err(err) => {
                warn!(framework = %ticket.framework, error = %err, "supplier fetch failed");
                self.panel = Panel::Failed(format!(
                    "Could not load suppliers for {}: {}",
                    ticket.framework, err
                ));
                Applied::Failed
            }
        }
    }

    fn replace_boxes(&mut self, suppliers: Vec<Supplier>) {
        self.boxes.clear();

        for supplier in suppliers {
            let id = BoxId(self.next_box);
            self.next_box += 1;

            let rendered = render_supplier_box(id, &supplier);
            self.boxes.insert(id, (rendered, supplier));
        }
    }

    /// Shows the details of the clicked box.
    pub fn on_box_click(&mut self, id: BoxId) -> Result<DetailsView> {
        let (_, supplier) = self.boxes.get(&id).ok_or(ViewError::UnknownBox(id))?;
        let details = render_details(&supplier.name, &supplier.details);

        debug!(box_id = %id, supplier = %supplier.name, "showing supplier details");

        self.panel = Panel::Visible { id, details: details.clone() };
        Ok(details)
    }

    /// Delegated click lookup: maps a clicked element's `data-box-id` to a
    /// box in the current list. Ids from replaced lists do not resolve.
    pub fn resolve_target(&self, data_box_id: &str) -> Option<BoxId> {
        let id = BoxId(data_box_id.trim().parse().ok()?);
        self.boxes.contains_key(&id).then_some(id)
    }

    /// Box at a 1-based position in the list.
    pub fn box_at(&self, position: usize) -> Option<BoxId> {
        position
            .checked_sub(1)
            .and_then(|i| self.boxes.keys().nth(i))
            .copied()
    }

    pub fn dispatch(&mut self, event: ViewEvent) -> Result<Dispatched> {
        match event {
            ViewEvent::FrameworkChanged(selected) => {
                Ok(Dispatched::Fetch(self.on_framework_change(&selected)))
            }
            ViewEvent::SuppliersLoaded { ticket, outcome } => {
                Ok(Dispatched::Applied(self.apply_fetch(&ticket, outcome)))
            }
            ViewEvent::BoxClicked(id) => {
                self.on_box_click(id)?;
                Ok(Dispatched::Shown(id))
            }
        }
    }

    pub fn container_html(&self) -> String {
        let inner: String = self.boxes().map(SupplierBox::to_html).collect();
        format!("<div id=\"suppliers-container\">{}</div>", inner)
    }

    pub fn panel_html(&self) -> String {
        match &self.panel {
            Panel::Hidden => {
                "<div id=\"supplier-details\" style=\"display: none\"></div>".to_string()
            }
            Panel::Visible { details, .. } => format!(
                "<div id=\"supplier-details\" style=\"display: block\">{}</div>",
                details.to_html()
            ),
            Panel::Failed(message) => format!(
                "<div id=\"supplier-details\" class=\"error\" style=\"display: block\"><p>{}</p></div>",
                escape_html(message)
            ),
        }
    }
}
