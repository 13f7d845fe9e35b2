//! Team members and repair orders, kept together because assignment links them both ways:
//! `Order::assigned_to` names a member and `TeamMember::assigned_orders` lists order ids.

use chrono::{DateTime, Utc};

use crate::{
    dto::{
        orders::{Board, BoardColumn, CreateOrderRequest, UpdateOrderRequest},
        team::{CreateMemberRequest, UpdateMemberRequest},
    },
    error::{AppError, AppResult, Validator},
    models::{MemberStatus, Order, OrderStatus, TeamMember},
};

#[derive(Debug, Clone, Default)]
pub struct MemberFilter {
    pub q: Option<String>,
    pub role: Option<String>,
    pub status: Option<MemberStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub q: Option<String>,
    pub status: Option<OrderStatus>,
    pub assigned_to: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamStore {
    members: Vec<TeamMember>,
    orders: Vec<Order>,
    /// Highest order id handed out, including orders parked outside the list.
    issued_order_id: u64,
}

impl TeamStore {
    pub fn new(members: Vec<TeamMember>, orders: Vec<Order>) -> Self {
        let issued_order_id = max_numeric_id(orders.iter().map(|o| o.id.as_str()));
        Self {
            members,
            orders,
            issued_order_id,
        }
    }

    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn member(&self, id: &str) -> Option<&TeamMember> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn order(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    fn member_mut(&mut self, id: &str) -> AppResult<&mut TeamMember> {
        self.members
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(AppError::NotFound)
    }

    fn order_mut(&mut self, id: &str) -> AppResult<&mut Order> {
        self.orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(AppError::NotFound)
    }

    pub fn next_member_id(&self) -> String {
        next_numeric_id(self.members.iter().map(|m| m.id.as_str()))
    }

    /// The id the next order would get, without reserving it.
    pub fn next_order_id(&self) -> String {
        let listed = max_numeric_id(self.orders.iter().map(|o| o.id.as_str()));
        (listed.max(self.issued_order_id) + 1).to_string()
    }

    /// Hands out the next order id. A reserved id is never handed out again.
    pub fn reserve_order_id(&mut self) -> String {
        let id = self.next_order_id();
        self.note_order_id(&id);
        id
    }

    /// Marks an id issued elsewhere, such as an order parked under `newOrder`.
    pub fn note_order_id(&mut self, id: &str) {
        let issued = max_numeric_id(std::iter::once(id));
        self.issued_order_id = self.issued_order_id.max(issued);
    }

    pub fn search_members(&self, filter: &MemberFilter) -> Vec<TeamMember> {
        let needle = filter
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);
        self.members
            .iter()
            .filter(|m| {
                needle.as_ref().is_none_or(|q| {
                    [&m.name, &m.email, &m.phone, &m.role, &m.department]
                        .iter()
                        .any(|field| field.to_lowercase().contains(q))
                })
            })
            .filter(|m| {
                filter
                    .role
                    .as_deref()
                    .filter(|r| !r.is_empty())
                    .is_none_or(|r| m.role.eq_ignore_ascii_case(r))
            })
            .filter(|m| filter.status.is_none_or(|s| m.status == s))
            .cloned()
            .collect()
    }

    pub fn search_orders(&self, filter: &OrderFilter) -> Vec<Order> {
        let needle = filter
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);
        self.orders
            .iter()
            .filter(|o| filter.status.is_none_or(|s| o.status == s))
            .filter(|o| {
                filter
                    .assigned_to
                    .as_deref()
                    .is_none_or(|id| o.assigned_to.as_deref() == Some(id))
            })
            .filter(|o| {
                needle.as_ref().is_none_or(|q| {
                    [&o.id, &o.customer_name, &o.customer_email, &o.device, &o.description]
                        .iter()
                        .any(|field| field.to_lowercase().contains(q))
                })
            })
            .cloned()
            .collect()
    }

    pub fn add_member(
        &mut self,
        payload: CreateMemberRequest,
        now: DateTime<Utc>,
    ) -> AppResult<TeamMember> {
        let mut v = Validator::new();
        v.require("name", &payload.name, "Name is required");
        v.email("email", &payload.email);
        v.require("phone", &payload.phone, "Phone is required");
        v.require("role", &payload.role, "Role is required");
        v.finish()?;

        let member = TeamMember {
            id: self.next_member_id(),
            name: payload.name.trim().to_string(),
            email: payload.email.trim().to_string(),
            phone: payload.phone.trim().to_string(),
            role: payload.role.trim().to_string(),
            department: payload.department.trim().to_string(),
            status: payload.status.unwrap_or(MemberStatus::Active),
            avatar: payload.avatar,
            join_date: now.date_naive(),
            last_active: now,
            assigned_orders: Vec::new(),
        };
        self.members.push(member.clone());
        Ok(member)
    }

    pub fn update_member(
        &mut self,
        id: &str,
        payload: UpdateMemberRequest,
        now: DateTime<Utc>,
    ) -> AppResult<TeamMember> {
        let mut v = Validator::new();
        if let Some(name) = &payload.name {
            v.require("name", name, "Name is required");
        }
        if let Some(email) = &payload.email {
            v.email("email", email);
        }
        if let Some(phone) = &payload.phone {
            v.require("phone", phone, "Phone is required");
        }
        v.finish()?;

        let member = self.member_mut(id)?;
        if let Some(name) = payload.name {
            member.name = name.trim().to_string();
        }
        if let Some(email) = payload.email {
            member.email = email.trim().to_string();
        }
        if let Some(phone) = payload.phone {
            member.phone = phone.trim().to_string();
        }
        if let Some(role) = payload.role {
            member.role = role;
        }
        if let Some(department) = payload.department {
            member.department = department;
        }
        if let Some(status) = payload.status {
            member.status = status;
        }
        if let Some(avatar) = payload.avatar {
            member.avatar = Some(avatar).filter(|a| !a.is_empty());
        }
        member.last_active = now;
        Ok(member.clone())
    }

    /// Removes the member and unassigns every order it held.
    pub fn delete_member(&mut self, id: &str) -> AppResult<TeamMember> {
        let index = self
            .members
            .iter()
            .position(|m| m.id == id)
            .ok_or(AppError::NotFound)?;

        let held = self.members[index].assigned_orders.clone();
        for order_id in &held {
            // Stale ids in assignedOrders are tolerated.
            if let Err(AppError::NotFound) = self.unassign_order(order_id) {
                tracing::debug!(member_id = id, order_id = %order_id, "assigned order no longer exists");
            }
        }
        // Orders pointing at the member without being listed on it.
        for order in self.orders.iter_mut() {
            if order.assigned_to.as_deref() == Some(id) {
                order.assigned_to = None;
            }
        }

        let index = self
            .members
            .iter()
            .position(|m| m.id == id)
            .ok_or(AppError::NotFound)?;
        Ok(self.members.remove(index))
    }

    /// Assigns the order to `member_id`, taking it away from any other member.
    pub fn assign_order(&mut self, order_id: &str, member_id: &str) -> AppResult<Order> {
        if self.member(member_id).is_none() || self.order(order_id).is_none() {
            return Err(AppError::NotFound);
        }

        for member in self.members.iter_mut() {
            member.assigned_orders.retain(|id| id != order_id);
        }
        self.member_mut(member_id)?
            .assigned_orders
            .push(order_id.to_string());

        let order = self.order_mut(order_id)?;
        order.assigned_to = Some(member_id.to_string());
        Ok(order.clone())
    }

    pub fn unassign_order(&mut self, order_id: &str) -> AppResult<Order> {
        for member in self.members.iter_mut() {
            member.assigned_orders.retain(|id| id != order_id);
        }
        let order = self.order_mut(order_id)?;
        order.assigned_to = None;
        Ok(order.clone())
    }

    /// Checks the create-order form. Each failing field gets its own message.
    pub fn validate_new_order(&self, payload: &CreateOrderRequest) -> AppResult<()> {
        let mut v = Validator::new();
        v.require("description", &payload.description, "Description is required");
        if v.require("assignedTo", &payload.assigned_to, "Please select a team member")
            && self.member(payload.assigned_to.trim()).is_none()
        {
            v.add("assignedTo", "Selected team member does not exist");
        }
        v.require("customerName", &payload.customer_name, "Customer name is required");
        v.email("customerEmail", &payload.customer_email);
        v.require("customerPhone", &payload.customer_phone, "Phone number is required");
        if payload.total.is_some_and(|t| !t.is_finite() || t < 0.0) {
            v.add("total", "Total must be a positive amount");
        }
        v.finish()
    }

    /// Builds an order from a validated form under a freshly reserved id, without inserting it.
    pub fn build_order(&mut self, payload: CreateOrderRequest, now: DateTime<Utc>) -> Order {
        let assigned = payload.assigned_to.trim().to_string();
        Order {
            id: self.reserve_order_id(),
            customer_name: payload.customer_name.trim().to_string(),
            customer_email: payload.customer_email.trim().to_string(),
            customer_phone: payload.customer_phone.trim().to_string(),
            device: payload.device.trim().to_string(),
            description: payload.description.trim().to_string(),
            status: payload.status.unwrap_or(OrderStatus::DropByCustomer),
            assigned_to: Some(assigned).filter(|a| !a.is_empty()),
            created_at: now,
            total: payload.total.unwrap_or(0.0),
        }
    }

    /// Appends the order and links its assignee. An id already on the list is a conflict.
    pub fn insert_order(&mut self, order: Order) -> AppResult<Order> {
        if self.order(&order.id).is_some() {
            return Err(AppError::Conflict(format!("Order {} already exists", order.id)));
        }
        let assignee = order.assigned_to.clone();
        let id = order.id.clone();
        self.orders.push(Order {
            assigned_to: None,
            ..order
        });
        match assignee {
            Some(member_id) if self.member(&member_id).is_some() => {
                self.assign_order(&id, &member_id)
            }
            _ => self.order(&id).cloned().ok_or(AppError::NotFound),
        }
    }

    pub fn create_order(
        &mut self,
        payload: CreateOrderRequest,
        now: DateTime<Utc>,
    ) -> AppResult<Order> {
        self.validate_new_order(&payload)?;
        let order = self.build_order(payload, now);
        self.insert_order(order)
    }

    pub fn update_order(&mut self, id: &str, payload: UpdateOrderRequest) -> AppResult<Order> {
        let mut v = Validator::new();
        if let Some(name) = &payload.customer_name {
            v.require("customerName", name, "Customer name is required");
        }
        if let Some(email) = &payload.customer_email {
            v.email("customerEmail", email);
        }
        if let Some(phone) = &payload.customer_phone {
            v.require("customerPhone", phone, "Phone number is required");
        }
        if let Some(description) = &payload.description {
            v.require("description", description, "Description is required");
        }
        if payload.total.is_some_and(|t| !t.is_finite() || t < 0.0) {
            v.add("total", "Total must be a positive amount");
        }
        v.finish()?;

        let order = self.order_mut(id)?;
        if let Some(name) = payload.customer_name {
            order.customer_name = name.trim().to_string();
        }
        if let Some(email) = payload.customer_email {
            order.customer_email = email.trim().to_string();
        }
        if let Some(phone) = payload.customer_phone {
            order.customer_phone = phone.trim().to_string();
        }
        if let Some(device) = payload.device {
            order.device = device;
        }
        if let Some(description) = payload.description {
            order.description = description;
        }
        if let Some(total) = payload.total {
            order.total = total;
        }
        Ok(order.clone())
    }

    pub fn set_order_total(&mut self, id: &str, total: f64) -> AppResult<Order> {
        if !total.is_finite() || total < 0.0 {
            let mut v = Validator::new();
            v.add("total", "Total must be a positive amount");
            v.finish()?;
        }
        let order = self.order_mut(id)?;
        order.total = total;
        Ok(order.clone())
    }

    /// Moves the order to `status`. Any stage can follow any stage. Returns the previous stage.
    pub fn set_order_status(
        &mut self,
        id: &str,
        status: OrderStatus,
    ) -> AppResult<(OrderStatus, Order)> {
        let order = self.order_mut(id)?;
        let previous = order.status;
        order.status = status;
        Ok((previous, order.clone()))
    }

    pub fn delete_order(&mut self, id: &str) -> AppResult<Order> {
        self.unassign_order(id)?;
        let index = self
            .orders
            .iter()
            .position(|o| o.id == id)
            .ok_or(AppError::NotFound)?;
        Ok(self.orders.remove(index))
    }

    /// Six columns in workflow order; orders keep insertion order inside a column.
    pub fn board(&self) -> Board {
        let columns = OrderStatus::ALL
            .into_iter()
            .map(|status| {
                let orders: Vec<Order> = self
                    .orders
                    .iter()
                    .filter(|o| o.status == status)
                    .cloned()
                    .collect();
                BoardColumn {
                    status,
                    title: status.title().to_string(),
                    count: orders.len(),
                    orders,
                }
            })
            .collect();
        Board {
            columns,
            total: self.orders.len(),
        }
    }
}

fn max_numeric_id<'a>(ids: impl Iterator<Item = &'a str>) -> u64 {
    ids.filter_map(|id| id.trim_start_matches('#').parse::<u64>().ok())
        .max()
        .unwrap_or(0)
}

fn next_numeric_id<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    (max_numeric_id(ids) + 1).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    fn store() -> TeamStore {
        TeamStore::new(seed::team_members(), seed::orders())
    }

    fn valid_order() -> CreateOrderRequest {
        CreateOrderRequest {
            customer_name: "Laura Pons".into(),
            customer_email: "laura@example.com".into(),
            customer_phone: "600000001".into(),
            device: "Galaxy A52".into(),
            description: "Does not charge".into(),
            assigned_to: "2".into(),
            total: None,
            status: None,
        }
    }

    #[test]
    fn reassigning_moves_order_between_members() {
        let mut store = store();
        let order = store.assign_order("18", "2").unwrap();

        assert_eq!(order.assigned_to.as_deref(), Some("2"));
        assert!(!store.member("1").unwrap().assigned_orders.contains(&"18".to_string()));
        let held_by_two = store
            .member("2")
            .unwrap()
            .assigned_orders
            .iter()
            .filter(|id| *id == "18")
            .count();
        assert_eq!(held_by_two, 1);
        assert_eq!(store.order("18").unwrap().assigned_to.as_deref(), Some("2"));
    }

    #[test]
    fn assigning_twice_keeps_a_single_entry() {
        let mut store = store();
        store.assign_order("20", "3").unwrap();
        store.assign_order("20", "3").unwrap();
        assert_eq!(store.member("3").unwrap().assigned_orders, vec!["20".to_string()]);
    }

    #[test]
    fn assigning_to_unknown_member_changes_nothing() {
        let mut store = store();
        let before = store.clone();
        assert!(matches!(store.assign_order("18", "99"), Err(AppError::NotFound)));
        assert_eq!(store, before);
    }

    #[test]
    fn deleting_member_unassigns_its_orders() {
        let mut store = store();
        let removed = store.delete_member("1").unwrap();
        assert_eq!(removed.id, "1");
        assert!(store.member("1").is_none());
        for id in ["18", "21"] {
            assert_eq!(store.order(id).unwrap().assigned_to, None);
        }
        assert_eq!(store.order("19").unwrap().assigned_to.as_deref(), Some("2"));
    }

    #[test]
    fn deleting_member_clears_orders_it_did_not_list() {
        let mut store = store();
        store.order_mut("22").unwrap().assigned_to = Some("3".into());
        store.delete_member("3").unwrap();
        assert_eq!(store.order("22").unwrap().assigned_to, None);
    }

    #[test]
    fn invalid_order_reports_every_missing_field() {
        let mut store = store();
        let before = store.orders().len();
        let err = store
            .create_order(CreateOrderRequest::default(), Utc::now())
            .unwrap_err();
        let AppError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        for field in [
            "description",
            "assignedTo",
            "customerName",
            "customerEmail",
            "customerPhone",
        ] {
            assert!(fields.contains_key(field), "missing error for {field}");
        }
        assert_eq!(store.orders().len(), before);
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut store = store();
        let payload = CreateOrderRequest {
            customer_email: "laura.example.com".into(),
            ..valid_order()
        };
        let AppError::Validation(fields) = store.create_order(payload, Utc::now()).unwrap_err()
        else {
            panic!("expected validation error");
        };
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["customerEmail"], "Email is not valid");
    }

    #[test]
    fn created_order_gets_next_id_and_assignee() {
        let mut store = store();
        let order = store.create_order(valid_order(), Utc::now()).unwrap();
        assert_eq!(order.id, "23");
        assert_eq!(order.status, OrderStatus::DropByCustomer);
        assert!(store.member("2").unwrap().assigned_orders.contains(&order.id));
    }

    #[test]
    fn any_stage_can_follow_any_stage() {
        let mut store = store();
        let (previous, order) = store
            .set_order_status("20", OrderStatus::PickupByCustomer)
            .unwrap();
        assert_eq!(previous, OrderStatus::DropByCustomer);
        assert_eq!(order.status, OrderStatus::PickupByCustomer);
        let (_, order) = store.set_order_status("20", OrderStatus::Received).unwrap();
        assert_eq!(order.status, OrderStatus::Received);
    }

    #[test]
    fn board_groups_orders_by_stage() {
        let board = store().board();
        assert_eq!(board.columns.len(), 6);
        assert_eq!(board.total, 5);
        assert_eq!(board.columns[0].status, OrderStatus::DropByCustomer);
        let wip = &board.columns[2];
        assert_eq!(wip.status, OrderStatus::WorkInProgress);
        assert_eq!(wip.count, 1);
        assert_eq!(wip.orders[0].id, "18");
    }

    #[test]
    fn member_search_matches_text_role_and_status() {
        let store = store();
        let filter = MemberFilter {
            q: Some("REPAIRS".into()),
            ..Default::default()
        };
        assert_eq!(store.search_members(&filter).len(), 2);

        let filter = MemberFilter {
            role: Some("support".into()),
            status: Some(MemberStatus::OnLeave),
            ..Default::default()
        };
        let found = store.search_members(&filter);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "4");
    }

    #[test]
    fn deleting_order_removes_it_from_member() {
        let mut store = store();
        store.delete_order("21").unwrap();
        assert!(store.order("21").is_none());
        assert_eq!(store.member("1").unwrap().assigned_orders, vec!["18".to_string()]);
    }

    #[test]
    fn parked_order_id_is_not_handed_out_again() {
        let mut store = store();
        let parked = store.build_order(valid_order(), Utc::now());
        assert_eq!(parked.id, "23");
        assert!(store.order("23").is_none());

        let on_board = store.create_order(valid_order(), Utc::now()).unwrap();
        assert_eq!(on_board.id, "24");
        assert_eq!(store.next_order_id(), "25");
    }

    #[test]
    fn noted_ids_move_the_counter_forward_only() {
        let mut store = store();
        store.note_order_id("40");
        store.note_order_id("30");
        assert_eq!(store.reserve_order_id(), "41");
    }

    #[test]
    fn non_finite_total_is_rejected() {
        let mut store = store();
        let before = store.clone();
        for total in [f64::INFINITY, f64::NAN, -1.0] {
            let AppError::Validation(fields) = store.set_order_total("18", total).unwrap_err()
            else {
                panic!("expected validation error");
            };
            assert!(fields.contains_key("total"));
        }
        assert_eq!(store, before);
    }
}
