use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ordersync_core::ChannelSyncPort;
use ordersync_domain::{AdapterError, SyncOrdersRequest, SyncOrdersResponse};

type Scripted = Result<SyncOrdersResponse, AdapterError>;

/// Channel adapter that replays scripted responses keyed by
/// `(adapter channel, sub-account)` and records every request.
///
/// Unscripted targets succeed with zero orders.
#[derive(Default, Clone)]
pub struct ScriptedChannelAdapter {
    responses: Arc<Mutex<HashMap<(String, Option<String>), Scripted>>>,
    requests: Arc<Mutex<Vec<SyncOrdersRequest>>>,
}

impl ScriptedChannelAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, channel: &str, sub_account: Option<&str>, response: Scripted) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((channel.to_string(), sub_account.map(String::from)), response);
        self
    }

    pub fn requests(&self) -> Vec<SyncOrdersRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChannelSyncPort for ScriptedChannelAdapter {
    async fn sync_orders(&self, request: &SyncOrdersRequest) -> Scripted {
        self.requests.lock().unwrap().push(request.clone());
        let key = (request.channel.clone(), request.sub_account_id.clone());
        self.responses.lock().unwrap().get(&key).cloned().unwrap_or_else(|| {
            Ok(SyncOrdersResponse { success: Some(true), synced: Some(0), ..Default::default() })
        })
    }
}

pub fn synced(count: u64) -> Scripted {
    Ok(SyncOrdersResponse { success: Some(true), synced: Some(count), ..Default::default() })
}
