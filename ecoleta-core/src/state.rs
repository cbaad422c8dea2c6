use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::FormError;
use crate::geolocation::{GeolocationFailure, PositionOutcome};
use crate::models::{Category, ContactField, ContactInfo, Coordinate, parse_selection};
use crate::payload::{
    MissingField, PayloadSource, SubmissionPayload, ValidationPolicy, build_payload,
};

/// Progress of one remote list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

impl LoadState {
    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed(_))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub enum SubmitState {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Rejected(Vec<MissingField>),
    Failed(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub enum GeolocationState {
    #[default]
    Pending,
    Located,
    Failed(GeolocationFailure),
}

/// Tag carried by a sub-region fetch: the region that caused it and the
/// sequence number it was issued under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubRegionRequest {
    pub region: String,
    pub seq: u64,
}

/// Inputs to the form: user interaction and results of earlier commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    CategoriesLoaded(Result<Vec<Category>, String>),
    RegionsLoaded(Result<Vec<String>, String>),
    SubRegionsLoaded {
        request: SubRegionRequest,
        result: Result<Vec<String>, String>,
    },
    DevicePositionResolved(PositionOutcome),
    RegionSelected(String),
    SubRegionSelected(String),
    MapClicked(Coordinate),
    CategoryToggled(u32),
    ContactEdited { field: ContactField, value: String },
    RetryRequested,
    SubmitRequested,
    SubmitFinished(Result<(), String>),
}

/// Side effects the host must perform on the form's behalf.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    LoadCategories,
    LoadRegions,
    LoadSubRegions(SubRegionRequest),
    LocateDevice,
    Submit(SubmissionPayload),
    NotifyCreated,
    NavigateHome,
}

/// Complete state of the collection-point form.
///
/// All mutation goes through [`FormState::apply`], which returns the commands
/// the host has to run. Results come back as further events.
#[derive(Clone, Debug, Default, Serialize)]
pub struct FormState {
    categories: Vec<Category>,
    categories_status: LoadState,
    regions: Vec<String>,
    regions_status: LoadState,
    sub_regions: Vec<String>,
    sub_regions_status: LoadState,
    region: Option<String>,
    sub_region: Option<String>,
    chosen_position: Coordinate,
    device_position: Option<Coordinate>,
    geolocation: GeolocationState,
    selected: BTreeSet<u32>,
    contact: ContactInfo,
    submit: SubmitState,
    #[serde(skip)]
    policy: ValidationPolicy,
    #[serde(skip)]
    sub_region_seq: u64,
    #[serde(skip)]
    pending_sub_regions: Option<SubRegionRequest>,
    #[serde(skip)]
    unmounted: bool,
}

impl FormState {
    pub fn new(policy: ValidationPolicy) -> Self {
        FormState {
            policy,
            ..Default::default()
        }
    }

    /// Commands to run when the form appears on screen.
    pub fn mount(&mut self) -> Vec<Command> {
        log::info!("mounting collection point form");
        self.categories_status = LoadState::Loading;
        self.regions_status = LoadState::Loading;
        self.geolocation = GeolocationState::Pending;
        vec![
            Command::LoadCategories,
            Command::LoadRegions,
            Command::LocateDevice,
        ]
    }

    /// Detach the form from the screen. Every later event, including results
    /// of commands still in flight, is ignored.
    pub fn unmount(&mut self) {
        self.unmounted = true;
        self.pending_sub_regions = None;
    }

    pub fn is_unmounted(&self) -> bool {
        self.unmounted
    }

    pub fn apply(&mut self, event: Event) -> Vec<Command> {
        if self.unmounted {
            log::debug!("form unmounted, dropping {}", describe_event(&event));
            return Vec::new();
        }
        log::debug!("event: {}", describe_event(&event));
        match event {
            Event::CategoriesLoaded(result) => {
                self.on_categories(result);
                Vec::new()
            }
            Event::RegionsLoaded(result) => {
                match result {
                    Ok(list) => {
                        self.regions = list;
                        self.regions_status = LoadState::Loaded;
                    }
                    Err(message) => {
                        log::warn!("region list failed: {message}");
                        self.regions_status = LoadState::Failed(message);
                    }
                }
                Vec::new()
            }
            Event::SubRegionsLoaded { request, result } => {
                self.on_sub_regions(request, result);
                Vec::new()
            }
            Event::DevicePositionResolved(outcome) => {
                self.on_device_position(outcome);
                Vec::new()
            }
            Event::RegionSelected(raw) => self.select_region(&raw),
            Event::SubRegionSelected(raw) => {
                self.select_sub_region(&raw);
                Vec::new()
            }
            Event::MapClicked(at) => {
                self.chosen_position = at;
                Vec::new()
            }
            Event::CategoryToggled(id) => {
                self.toggle_category(id);
                Vec::new()
            }
            Event::ContactEdited { field, value } => {
                self.contact.set(field, value);
                Vec::new()
            }
            Event::RetryRequested => self.retry(),
            Event::SubmitRequested => self.submit(),
            Event::SubmitFinished(result) => match result {
                Ok(()) => {
                    log::info!("collection point created");
                    self.submit = SubmitState::Succeeded;
                    vec![Command::NotifyCreated, Command::NavigateHome]
                }
                Err(message) => {
                    log::warn!("submission failed: {message}");
                    self.submit = SubmitState::Failed(message);
                    Vec::new()
                }
            },
        }
    }

    fn on_categories(&mut self, result: Result<Vec<Category>, String>) {
        match result {
            Ok(list) => {
                self.selected.retain(|id| list.iter().any(|c| c.id == *id));
                self.categories = list;
                self.categories_status = LoadState::Loaded;
            }
            Err(message) => {
                log::warn!("category catalog failed: {message}");
                self.categories_status = LoadState::Failed(message);
            }
        }
    }

    fn on_sub_regions(&mut self, request: SubRegionRequest, result: Result<Vec<String>, String>) {
        let current = self.pending_sub_regions.as_ref() == Some(&request)
            && self.region.as_deref() == Some(request.region.as_str());
        if !current {
            log::warn!(
                "discarding stale sub-region response for {} (#{})",
                request.region,
                request.seq
            );
            return;
        }
        self.pending_sub_regions = None;
        match result {
            Ok(list) => {
                self.sub_regions = list;
                self.sub_regions_status = LoadState::Loaded;
            }
            Err(message) => {
                log::warn!("sub-region list for {} failed: {message}", request.region);
                self.sub_regions_status = LoadState::Failed(message);
            }
        }
    }

    fn on_device_position(&mut self, outcome: PositionOutcome) {
        if self.geolocation == GeolocationState::Located {
            return;
        }
        match outcome {
            Ok(at) => {
                self.device_position = Some(at);
                self.geolocation = GeolocationState::Located;
            }
            Err(failure) => {
                log::warn!("{}", FormError::Geolocation(failure.clone()));
                self.geolocation = GeolocationState::Failed(failure);
            }
        }
    }

    fn select_region(&mut self, raw: &str) -> Vec<Command> {
        let next = parse_selection(raw);
        if next == self.region {
            return Vec::new();
        }
        self.region = next;
        self.sub_regions.clear();
        self.sub_region = None;
        match self.region.clone() {
            Some(region) => vec![Command::LoadSubRegions(self.issue_sub_region_request(region))],
            None => {
                self.pending_sub_regions = None;
                self.sub_regions_status = LoadState::Idle;
                Vec::new()
            }
        }
    }

    fn issue_sub_region_request(&mut self, region: String) -> SubRegionRequest {
        self.sub_region_seq += 1;
        let request = SubRegionRequest {
            region,
            seq: self.sub_region_seq,
        };
        self.pending_sub_regions = Some(request.clone());
        self.sub_regions_status = LoadState::Loading;
        request
    }

    fn select_sub_region(&mut self, raw: &str) {
        if self.region.is_none() {
            return;
        }
        match parse_selection(raw) {
            None => self.sub_region = None,
            Some(city) if self.sub_regions.contains(&city) => self.sub_region = Some(city),
            Some(city) => log::warn!("ignoring city {city:?} missing from the loaded list"),
        }
    }

    fn toggle_category(&mut self, id: u32) {
        if !self.categories.iter().any(|c| c.id == id) {
            log::warn!("ignoring toggle of unknown category {id}");
            return;
        }
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    fn retry(&mut self) -> Vec<Command> {
        let mut out = Vec::new();
        if self.categories_status.is_failed() {
            self.categories_status = LoadState::Loading;
            out.push(Command::LoadCategories);
        }
        if self.regions_status.is_failed() {
            self.regions_status = LoadState::Loading;
            out.push(Command::LoadRegions);
        }
        if self.sub_regions_status.is_failed()
            && let Some(region) = self.region.clone()
        {
            out.push(Command::LoadSubRegions(self.issue_sub_region_request(region)));
        }
        out
    }

    fn submit(&mut self) -> Vec<Command> {
        if !self.can_submit() {
            log::debug!("submission locked in state {:?}", self.submit);
            return Vec::new();
        }
        match self.payload() {
            Ok(payload) => {
                log::info!("submitting collection point with {} items", payload.items.len());
                self.submit = SubmitState::InFlight;
                vec![Command::Submit(payload)]
            }
            Err(FormError::Validation(missing)) => {
                self.submit = SubmitState::Rejected(missing);
                Vec::new()
            }
            Err(err) => {
                self.submit = SubmitState::Failed(err.to_string());
                Vec::new()
            }
        }
    }

    /// Snapshot of the current fields as a submission body, checked under
    /// the form's validation policy.
    pub fn payload(&self) -> Result<SubmissionPayload, FormError> {
        build_payload(
            PayloadSource {
                contact: &self.contact,
                region: self.region.as_deref(),
                sub_region: self.sub_region.as_deref(),
                position: self.chosen_position,
                items: &self.selected,
            },
            self.policy,
        )
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn categories_status(&self) -> &LoadState {
        &self.categories_status
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn regions_status(&self) -> &LoadState {
        &self.regions_status
    }

    pub fn sub_regions(&self) -> &[String] {
        &self.sub_regions
    }

    pub fn sub_regions_status(&self) -> &LoadState {
        &self.sub_regions_status
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn sub_region(&self) -> Option<&str> {
        self.sub_region.as_deref()
    }

    pub fn chosen_position(&self) -> Coordinate {
        self.chosen_position
    }

    pub fn device_position(&self) -> Option<Coordinate> {
        self.device_position
    }

    /// Where the map opens: the device position, or `(0, 0)` without one.
    pub fn map_center(&self) -> Coordinate {
        self.device_position.unwrap_or_default()
    }

    pub fn geolocation(&self) -> &GeolocationState {
        &self.geolocation
    }

    pub fn selected(&self) -> &BTreeSet<u32> {
        &self.selected
    }

    pub fn is_selected(&self, id: u32) -> bool {
        self.selected.contains(&id)
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn submit_state(&self) -> &SubmitState {
        &self.submit
    }

    pub fn can_submit(&self) -> bool {
        !matches!(self.submit, SubmitState::InFlight | SubmitState::Succeeded)
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }
}

/// Log line for an event. Contact values are reduced to their length.
fn describe_event(event: &Event) -> String {
    match event {
        Event::ContactEdited { field, value } => {
            format!("ContactEdited {{ field: {field}, len: {} }}", value.chars().count())
        }
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_catalog(ids: &[u32]) -> FormState {
        let mut s = FormState::default();
        s.mount();
        let list = ids
            .iter()
            .map(|id| Category {
                id: *id,
                title: format!("item {id}"),
                icon_url: format!("http://localhost:3333/uploads/{id}.svg"),
            })
            .collect();
        s.apply(Event::CategoriesLoaded(Ok(list)));
        s
    }

    fn sub_region_fetches(cmds: &[Command]) -> Vec<&SubRegionRequest> {
        cmds.iter()
            .filter_map(|c| match c {
                Command::LoadSubRegions(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn mount_issues_independent_loads() {
        let mut s = FormState::default();
        assert_eq!(
            s.mount(),
            vec![
                Command::LoadCategories,
                Command::LoadRegions,
                Command::LocateDevice
            ]
        );
        assert_eq!(s.categories_status(), &LoadState::Loading);
        assert_eq!(s.regions_status(), &LoadState::Loading);
    }

    #[test]
    fn toggle_twice_restores_membership() {
        let mut s = with_catalog(&[1, 2, 3]);
        s.apply(Event::CategoryToggled(1));
        for id in [1, 2, 3] {
            let before = s.selected().clone();
            s.apply(Event::CategoryToggled(id));
            s.apply(Event::CategoryToggled(id));
            assert_eq!(s.selected(), &before);
        }
    }

    #[test]
    fn unknown_category_is_not_selectable() {
        let mut s = with_catalog(&[1]);
        s.apply(Event::CategoryToggled(9));
        assert!(s.selected().is_empty());
    }

    #[test]
    fn catalog_reload_prunes_vanished_ids() {
        let mut s = with_catalog(&[1, 2]);
        s.apply(Event::CategoryToggled(1));
        s.apply(Event::CategoryToggled(2));
        s.apply(Event::CategoriesLoaded(Ok(vec![Category {
            id: 2,
            title: "Pilhas".into(),
            icon_url: String::new(),
        }])));
        assert_eq!(s.selected().iter().copied().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn sentinel_region_never_fetches() {
        let mut s = with_catalog(&[]);
        assert!(s.apply(Event::RegionSelected("0".into())).is_empty());
        assert!(s.sub_regions().is_empty());
        assert_eq!(s.region(), None);
    }

    #[test]
    fn region_change_fetches_once_and_clears_city() {
        let mut s = with_catalog(&[]);
        let cmds = s.apply(Event::RegionSelected("RJ".into()));
        let fetches = sub_region_fetches(&cmds);
        assert_eq!(fetches.len(), 1);
        let rj = fetches[0].clone();
        assert_eq!(rj.region, "RJ");
        s.apply(Event::SubRegionsLoaded {
            request: rj,
            result: Ok(vec!["Niterói".into(), "Rio de Janeiro".into()]),
        });
        s.apply(Event::SubRegionSelected("Niterói".into()));
        assert_eq!(s.sub_region(), Some("Niterói"));

        let cmds = s.apply(Event::RegionSelected("SP".into()));
        assert_eq!(sub_region_fetches(&cmds).len(), 1);
        assert_eq!(s.sub_region(), None);
        assert!(s.sub_regions().is_empty());
    }

    #[test]
    fn reselecting_same_region_is_a_no_op() {
        let mut s = with_catalog(&[]);
        s.apply(Event::RegionSelected("MG".into()));
        assert!(s.apply(Event::RegionSelected("MG".into())).is_empty());
    }

    #[test]
    fn reverting_to_sentinel_clears_cities_and_ignores_late_result() {
        let mut s = with_catalog(&[]);
        let cmds = s.apply(Event::RegionSelected("BA".into()));
        let ba = sub_region_fetches(&cmds)[0].clone();
        s.apply(Event::RegionSelected("0".into()));
        s.apply(Event::SubRegionsLoaded {
            request: ba,
            result: Ok(vec!["Salvador".into()]),
        });
        assert!(s.sub_regions().is_empty());
        assert_eq!(s.sub_regions_status(), &LoadState::Idle);
    }

    #[test]
    fn city_cannot_be_set_without_region() {
        let mut s = with_catalog(&[]);
        s.apply(Event::SubRegionSelected("Recife".into()));
        assert_eq!(s.sub_region(), None);
    }

    #[test]
    fn failed_loads_are_surfaced_and_retried() {
        let mut s = FormState::default();
        s.mount();
        s.apply(Event::CategoriesLoaded(Err("HTTP 500".into())));
        s.apply(Event::RegionsLoaded(Ok(vec!["PE".into()])));
        assert_eq!(s.categories_status(), &LoadState::Failed("HTTP 500".into()));
        assert_eq!(s.apply(Event::RetryRequested), vec![Command::LoadCategories]);
        assert_eq!(s.categories_status(), &LoadState::Loading);
        assert!(s.apply(Event::RetryRequested).is_empty());
    }

    #[test]
    fn retry_of_cities_issues_a_fresh_tag() {
        let mut s = with_catalog(&[]);
        let first = sub_region_fetches(&s.apply(Event::RegionSelected("PR".into())))[0].clone();
        s.apply(Event::SubRegionsLoaded {
            request: first.clone(),
            result: Err("timeout".into()),
        });
        let cmds = s.apply(Event::RetryRequested);
        let second = sub_region_fetches(&cmds)[0].clone();
        assert_eq!(second.region, "PR");
        assert!(second.seq > first.seq);
    }

    #[test]
    fn device_position_is_set_once() {
        let mut s = FormState::default();
        s.mount();
        assert_eq!(s.map_center(), Coordinate::default());
        s.apply(Event::DevicePositionResolved(Ok(Coordinate::new(-8.05, -34.9))));
        s.apply(Event::DevicePositionResolved(Ok(Coordinate::new(1.0, 1.0))));
        assert_eq!(s.map_center(), Coordinate::new(-8.05, -34.9));
    }

    #[test]
    fn denied_location_keeps_origin_center() {
        let mut s = FormState::default();
        s.mount();
        s.apply(Event::DevicePositionResolved(Err(GeolocationFailure::Denied)));
        assert_eq!(s.device_position(), None);
        assert_eq!(s.map_center(), Coordinate::default());
        assert_eq!(
            s.geolocation(),
            &GeolocationState::Failed(GeolocationFailure::Denied)
        );
    }

    #[test]
    fn contact_edits_merge() {
        let mut s = FormState::default();
        s.apply(Event::ContactEdited {
            field: ContactField::Name,
            value: "Coleta Verde".into(),
        });
        s.apply(Event::ContactEdited {
            field: ContactField::Whatsapp,
            value: "8199".into(),
        });
        assert_eq!(s.contact().name, "Coleta Verde");
        assert_eq!(s.contact().email, "");
        assert_eq!(s.contact().whatsapp, "8199");
    }

    #[test]
    fn submit_is_locked_while_in_flight() {
        let mut s = with_catalog(&[1]);
        assert_eq!(s.apply(Event::SubmitRequested).len(), 1);
        assert!(!s.can_submit());
        assert!(s.apply(Event::SubmitRequested).is_empty());
        s.apply(Event::SubmitFinished(Err("HTTP 400".into())));
        assert!(s.can_submit());
        assert_eq!(s.submit_state(), &SubmitState::Failed("HTTP 400".into()));
    }

    #[test]
    fn success_notifies_then_navigates() {
        let mut s = with_catalog(&[1]);
        s.apply(Event::SubmitRequested);
        assert_eq!(
            s.apply(Event::SubmitFinished(Ok(()))),
            vec![Command::NotifyCreated, Command::NavigateHome]
        );
        assert!(!s.can_submit());
    }

    #[test]
    fn no_second_submission_after_success() {
        let mut s = with_catalog(&[1]);
        s.apply(Event::SubmitRequested);
        s.apply(Event::SubmitFinished(Ok(())));
        assert!(s.apply(Event::SubmitRequested).is_empty());
        assert_eq!(s.submit_state(), &SubmitState::Succeeded);
    }

    #[test]
    fn results_after_unmount_are_dropped() {
        let mut s = with_catalog(&[1, 2]);
        s.apply(Event::CategoryToggled(1));
        let rj = sub_region_fetches(&s.apply(Event::RegionSelected("RJ".into())))[0].clone();
        assert_eq!(s.apply(Event::RetryRequested), Vec::new());
        s.apply(Event::CategoriesLoaded(Err("HTTP 502".into())));
        assert_eq!(s.apply(Event::SubmitRequested).len(), 1);

        s.unmount();
        let before = serde_json::to_value(&s).unwrap();
        let late = [
            Event::SubRegionsLoaded {
                request: rj,
                result: Ok(vec!["Niterói".into()]),
            },
            Event::CategoriesLoaded(Ok(Vec::new())),
            Event::SubmitFinished(Ok(())),
            Event::DevicePositionResolved(Ok(Coordinate::new(-22.9, -43.2))),
            Event::RetryRequested,
            Event::SubmitRequested,
        ];
        for ev in late {
            assert!(s.apply(ev).is_empty());
        }
        assert!(s.is_unmounted());
        assert_eq!(serde_json::to_value(&s).unwrap(), before);
        assert_eq!(s.submit_state(), &SubmitState::InFlight);
    }

    #[test]
    fn contact_values_are_kept_out_of_event_logs() {
        let line = describe_event(&Event::ContactEdited {
            field: ContactField::Email,
            value: "maria@reciclar.org".into(),
        });
        assert!(line.contains("email"));
        assert!(line.contains("len: 18"));
        assert!(!line.contains("maria"));
        let line = describe_event(&Event::RegionSelected("SP".into()));
        assert!(line.contains("SP"));
    }

    #[test]
    fn city_must_come_from_the_loaded_list() {
        let mut s = with_catalog(&[]);
        let sp = sub_region_fetches(&s.apply(Event::RegionSelected("SP".into())))[0].clone();
        // still loading: nothing to pick from
        s.apply(Event::SubRegionSelected("Santos".into()));
        assert_eq!(s.sub_region(), None);
        s.apply(Event::SubRegionsLoaded {
            request: sp,
            result: Ok(vec!["Santos".into(), "Campinas".into()]),
        });
        s.apply(Event::SubRegionSelected("Atlantis".into()));
        assert_eq!(s.sub_region(), None);
        s.apply(Event::SubRegionSelected("Santos".into()));
        assert_eq!(s.sub_region(), Some("Santos"));
        s.apply(Event::SubRegionSelected("0".into()));
        assert_eq!(s.sub_region(), None);
    }

    #[test]
    fn strict_policy_blocks_incomplete_submission() {
        let mut s = FormState::new(ValidationPolicy::Strict);
        s.mount();
        assert!(s.apply(Event::SubmitRequested).is_empty());
        assert!(matches!(
            s.submit_state(),
            SubmitState::Rejected(f) if f.contains(&MissingField::Name)
        ));
        assert!(s.can_submit());
    }

    #[test]
    fn state_serializes_for_inspection() {
        let s = with_catalog(&[5]);
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["categories"][0]["image_url"], "http://localhost:3333/uploads/5.svg");
        assert_eq!(v["chosen_position"]["latitude"], 0.0);
        assert!(v.get("policy").is_none());
    }
}
