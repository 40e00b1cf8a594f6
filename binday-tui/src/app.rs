use std::sync::Arc;

use binday_core::{
    model::{AddressResult, BinType, CollectionRecord, CouncilId},
    service::BindayService,
};
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy)]
pub(crate) enum Screen {
    CouncilSelect,
    AddressSearch,
    ScheduleView,
}

/// One collection day of one stream, as shown in the schedule table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Pickup {
    pub date: NaiveDate,
    pub bin_type: BinType,
}

pub(crate) struct App {
    pub service: Arc<BindayService>,

    pub screen: Screen,
    pub councils: Vec<(CouncilId, String)>,
    pub council_list_index: usize,
    pub selected_council: Option<CouncilId>,

    pub postcode_input: String,
    pub address_results: Vec<AddressResult>,
    pub address_list_index: usize,
    pub selected_address: Option<AddressResult>,

    pub collections: Vec<CollectionRecord>,

    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new(service: Arc<BindayService>) -> Self {
        let councils = service.councils();
        Self {
            service,
            screen: Screen::CouncilSelect,
            councils,
            council_list_index: 0,
            selected_council: None,
            postcode_input: String::new(),
            address_results: Vec::new(),
            address_list_index: 0,
            selected_address: None,
            collections: Vec::new(),
            is_loading: false,
            error_message: None,
        }
    }

    pub(crate) fn select_current_council(&mut self) {
        if let Some((id, _name)) = self.councils.get(self.council_list_index) {
            self.selected_council = Some(id.clone());
            self.screen = Screen::AddressSearch;
        }
    }

    pub(crate) fn select_current_address(&mut self) -> Option<AddressResult> {
        let addr = self.address_results.get(self.address_list_index).cloned()?;
        self.selected_address = Some(addr.clone());
        self.screen = Screen::ScheduleView;
        Some(addr)
    }

    /// All collection days across streams, soonest first.
    pub(crate) fn pickups(&self) -> Vec<Pickup> {
        let mut pickups: Vec<Pickup> = self
            .collections
            .iter()
            .flat_map(|record| {
                record.collection_dates.iter().map(|date| Pickup {
                    date: *date,
                    bin_type: record.bin_type,
                })
            })
            .collect();
        pickups.sort_by_key(|pickup| pickup.date);
        pickups
    }
}
