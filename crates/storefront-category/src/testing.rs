//! In-memory ports for development and testing.
//!
//! Each double records what the controller did so assertions can inspect it.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use storefront_cart::{
    CartApiError, CartId, CartMutationClient, CartMutationResult, CartSnapshot,
    CartSnapshotClient, LineItem,
};
use url::Url;

use crate::dom::{ElementRef, LocalStorage, Modal, PageDom, PageHook, PageSignal};
use crate::error::PageError;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Default)]
struct DomState {
    attributes: HashMap<ElementRef, Vec<(String, String)>>,
    text: HashMap<ElementRef, String>,
    toggled: Vec<(ElementRef, String)>,
    html: HashMap<ElementRef, String>,
    focused: Vec<ElementRef>,
    signals: Vec<PageSignal>,
    hooks: Vec<PageHook>,
    scrolls: Vec<Duration>,
    reloads: Vec<Duration>,
    navigations: Vec<Url>,
}

/// [`PageDom`] that records every write.
#[derive(Debug, Default)]
pub struct RecordingDom {
    state: Mutex<DomState>,
}

impl RecordingDom {
    pub fn attribute(&self, target: &ElementRef, name: &str) -> Option<String> {
        lock(&self.state)
            .attributes
            .get(target)
            .and_then(|attrs| attrs.iter().find(|(n, _)| n == name))
            .map(|(_, v)| v.clone())
    }

    pub fn attributes_of(&self, target: &ElementRef) -> Vec<(String, String)> {
        lock(&self.state)
            .attributes
            .get(target)
            .cloned()
            .unwrap_or_default()
    }

    pub fn text(&self, target: &ElementRef) -> Option<String> {
        lock(&self.state).text.get(target).cloned()
    }

    pub fn toggled_classes(&self, target: &ElementRef) -> Vec<String> {
        lock(&self.state)
            .toggled
            .iter()
            .filter(|(el, _)| el == target)
            .map(|(_, class)| class.clone())
            .collect()
    }

    pub fn html(&self, target: &ElementRef) -> Option<String> {
        lock(&self.state).html.get(target).cloned()
    }

    pub fn focused(&self) -> Vec<ElementRef> {
        lock(&self.state).focused.clone()
    }

    pub fn signals(&self) -> Vec<PageSignal> {
        lock(&self.state).signals.clone()
    }

    pub fn hooks(&self) -> Vec<PageHook> {
        lock(&self.state).hooks.clone()
    }

    pub fn scrolls(&self) -> Vec<Duration> {
        lock(&self.state).scrolls.clone()
    }

    pub fn reloads(&self) -> Vec<Duration> {
        lock(&self.state).reloads.clone()
    }

    pub fn navigations(&self) -> Vec<Url> {
        lock(&self.state).navigations.clone()
    }
}

impl PageDom for RecordingDom {
    fn set_attribute(&self, target: &ElementRef, name: &str, value: &str) {
        let mut state = lock(&self.state);
        let attrs = state.attributes.entry(target.clone()).or_default();
        match attrs.iter_mut().find(|(n, _)| n == name) {
            Some(existing) => existing.1 = value.to_string(),
            None => attrs.push((name.to_string(), value.to_string())),
        }
    }

    fn set_text(&self, target: &ElementRef, text: &str) {
        lock(&self.state).text.insert(target.clone(), text.to_string());
    }

    fn toggle_class(&self, target: &ElementRef, class: &str) {
        lock(&self.state)
            .toggled
            .push((target.clone(), class.to_string()));
    }

    fn replace_html(&self, target: &ElementRef, html: &str) {
        lock(&self.state).html.insert(target.clone(), html.to_string());
    }

    fn focus(&self, target: &ElementRef) {
        lock(&self.state).focused.push(target.clone());
    }

    fn emit(&self, signal: PageSignal) {
        lock(&self.state).signals.push(signal);
    }

    fn subscribe(&self, hook: PageHook) {
        lock(&self.state).hooks.push(hook);
    }

    fn scroll_to_top(&self, duration: Duration) {
        lock(&self.state).scrolls.push(duration);
    }

    fn schedule_reload(&self, delay: Duration) {
        lock(&self.state).reloads.push(delay);
    }

    fn navigate(&self, url: &Url) {
        lock(&self.state).navigations.push(url.clone());
    }
}

/// [`Modal`] that keeps every message it was asked to show.
#[derive(Debug, Default)]
pub struct RecordingModal {
    messages: Mutex<Vec<String>>,
}

impl RecordingModal {
    pub fn messages(&self) -> Vec<String> {
        lock(&self.messages).clone()
    }
}

impl Modal for RecordingModal {
    fn alert(&self, html: &str) {
        lock(&self.messages).push(html.to_string());
    }
}

/// [`LocalStorage`] backed by a map.
#[derive(Debug)]
pub struct MemoryStorage {
    available: bool,
    items: Mutex<HashMap<String, String>>,
    writes: Mutex<usize>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self {
            available: true,
            items: Mutex::new(HashMap::new()),
            writes: Mutex::new(0),
        }
    }
}

impl MemoryStorage {
    /// Storage whose availability check fails.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::default()
        }
    }

    /// Number of `set_item` calls so far.
    pub fn writes(&self) -> usize {
        *lock(&self.writes)
    }
}

impl LocalStorage for MemoryStorage {
    fn is_available(&self) -> bool {
        self.available
    }

    fn get_item(&self, key: &str) -> Option<String> {
        lock(&self.items).get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), PageError> {
        *lock(&self.writes) += 1;
        lock(&self.items).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        lock(&self.items).remove(key);
    }
}

/// A call made against [`ScriptedCartApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartCall {
    FetchSnapshot,
    Create(Vec<LineItem>),
    Append(CartId, Vec<LineItem>),
    Delete(CartId),
}

/// Cart clients answering from scripted queues.
///
/// When a queue runs dry, reads return no carts, creates and appends succeed
/// with status 200 and deletes succeed.
#[derive(Debug, Default)]
pub struct ScriptedCartApi {
    snapshots: Mutex<VecDeque<Result<CartSnapshot, CartApiError>>>,
    mutations: Mutex<VecDeque<Result<CartMutationResult, CartApiError>>>,
    deletes: Mutex<VecDeque<Result<(), CartApiError>>>,
    calls: Mutex<Vec<CartCall>>,
}

impl ScriptedCartApi {
    pub fn with_snapshot(self, reply: Result<CartSnapshot, CartApiError>) -> Self {
        lock(&self.snapshots).push_back(reply);
        self
    }

    pub fn with_mutation(self, reply: Result<CartMutationResult, CartApiError>) -> Self {
        lock(&self.mutations).push_back(reply);
        self
    }

    pub fn with_delete(self, reply: Result<(), CartApiError>) -> Self {
        lock(&self.deletes).push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<CartCall> {
        lock(&self.calls).clone()
    }

    fn record(&self, call: CartCall) {
        lock(&self.calls).push(call);
    }

    fn next_mutation(&self) -> Result<CartMutationResult, CartApiError> {
        lock(&self.mutations).pop_front().unwrap_or(Ok(CartMutationResult {
            status: 200,
            cart_id: None,
        }))
    }
}

#[async_trait(?Send)]
impl CartSnapshotClient for ScriptedCartApi {
    async fn fetch_snapshot(&self) -> Result<CartSnapshot, CartApiError> {
        self.record(CartCall::FetchSnapshot);
        lock(&self.snapshots)
            .pop_front()
            .unwrap_or_else(|| Ok(CartSnapshot::default()))
    }
}

#[async_trait(?Send)]
impl CartMutationClient for ScriptedCartApi {
    async fn create_cart(
        &self,
        line_items: &[LineItem],
    ) -> Result<CartMutationResult, CartApiError> {
        self.record(CartCall::Create(line_items.to_vec()));
        self.next_mutation()
    }

    async fn append_line_items(
        &self,
        cart_id: &CartId,
        line_items: &[LineItem],
    ) -> Result<CartMutationResult, CartApiError> {
        self.record(CartCall::Append(cart_id.clone(), line_items.to_vec()));
        self.next_mutation()
    }

    async fn delete_cart(&self, cart_id: &CartId) -> Result<(), CartApiError> {
        self.record(CartCall::Delete(cart_id.clone()));
        lock(&self.deletes).pop_front().unwrap_or(Ok(()))
    }
}
