//! Thread-safe in-memory implementation of the storage contract.
//!
//! State lives in normalized maps behind one `RwLock`; every composite
//! operation runs under a single write guard, which makes it atomic with
//! respect to all other calls.

use crate::domain::{
    ARCHIVED_LIST_NAME, AccessType, Board, BoardId, Card, CardId, CardsList, DEFAULT_LIST_NAMES,
    ListId, ObjectKind, Plan, PlanId, Priority, Tag, TagId, UserId,
};
use crate::ports::{
    AccessStore, BoardStore, CardStore, ListStore, NewCard, PlanStore, StoreError, StoreResult,
    TagStore,
};
use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory store.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
    archived_list_id: ListId,
}

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    boards: BTreeMap<BoardId, String>,
    lists: BTreeMap<ListId, ListRecord>,
    cards: BTreeMap<CardId, CardRecord>,
    tags: BTreeMap<TagId, Tag>,
    plans: BTreeMap<PlanId, Plan>,
    card_tags: BTreeSet<(CardId, TagId)>,
    card_children: BTreeSet<(CardId, CardId)>,
    access: HashMap<(ObjectKind, i64, UserId), AccessType>,
}

#[derive(Debug, Clone)]
struct ListRecord {
    name: String,
    board_id: Option<BoardId>,
}

#[derive(Debug, Clone)]
struct CardRecord {
    name: String,
    description: String,
    user_id: UserId,
    assignee_id: Option<UserId>,
    expiration_date: Option<DateTime<Utc>>,
    priority: Priority,
    list_id: ListId,
    created_at: DateTime<Utc>,
    last_modified_at: DateTime<Utc>,
}

impl InMemoryStore {
    /// Creates an empty store holding only the global archived list.
    #[must_use]
    pub fn new() -> Self {
        let mut state = State::default();
        let archived_list_id = ListId::from_raw(alloc(&mut state));
        state.lists.insert(
            archived_list_id,
            ListRecord {
                name: ARCHIVED_LIST_NAME.to_owned(),
                board_id: None,
            },
        );
        Self {
            state: Arc::new(RwLock::new(state)),
            archived_list_id,
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|err| StoreError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|err| StoreError::persistence(std::io::Error::other(err.to_string())))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn alloc(state: &mut State) -> i64 {
    state.next_id += 1;
    state.next_id
}

fn assemble_board(state: &State, id: BoardId, name: &str) -> Board {
    Board {
        id,
        name: name.to_owned(),
        lists: state
            .lists
            .iter()
            .filter(|(_, record)| record.board_id == Some(id))
            .map(|(list_id, _)| *list_id)
            .collect(),
    }
}

fn assemble_list(state: &State, id: ListId, record: &ListRecord) -> CardsList {
    CardsList {
        id,
        name: record.name.clone(),
        board_id: record.board_id,
        cards: state
            .cards
            .iter()
            .filter(|(_, card)| card.list_id == id)
            .map(|(card_id, _)| *card_id)
            .collect(),
    }
}

fn assemble_card(state: &State, id: CardId, record: &CardRecord) -> Card {
    Card {
        id,
        name: record.name.clone(),
        description: record.description.clone(),
        user_id: record.user_id,
        assignee_id: record.assignee_id,
        expiration_date: record.expiration_date,
        priority: record.priority,
        list_id: record.list_id,
        children: state
            .card_children
            .iter()
            .filter(|(parent, _)| *parent == id)
            .map(|(_, child)| *child)
            .collect(),
        tags: state
            .card_tags
            .iter()
            .filter(|(card, _)| *card == id)
            .map(|(_, tag)| *tag)
            .collect(),
        created_at: record.created_at,
        last_modified_at: record.last_modified_at,
    }
}

/// Removes a card and every row that references it.
fn purge_card(state: &mut State, id: CardId) {
    state.cards.remove(&id);
    state
        .card_tags
        .retain(|(card_id, _)| *card_id != id);
    state
        .card_children
        .retain(|(parent, child)| *parent != id && *child != id);
    state.plans.retain(|_, plan| plan.card_id != id);
    state
        .access
        .retain(|(kind, object_id, _), _| !(*kind == ObjectKind::Card && *object_id == id.value()));
}

/// Removes a list, its cards, and every row that references them.
fn purge_list(state: &mut State, id: ListId) {
    state.lists.remove(&id);
    let card_ids: Vec<CardId> = state
        .cards
        .iter()
        .filter(|(_, card)| card.list_id == id)
        .map(|(card_id, _)| *card_id)
        .collect();
    for card_id in card_ids {
        purge_card(state, card_id);
    }
    state
        .access
        .retain(|(kind, object_id, _), _| !(*kind == ObjectKind::List && *object_id == id.value()));
}

impl BoardStore for InMemoryStore {
    fn insert_board(&self, name: &str, owner: UserId) -> StoreResult<Board> {
        let mut state = self.write()?;
        let id = BoardId::from_raw(alloc(&mut state));
        state.boards.insert(id, name.to_owned());
        for list_name in DEFAULT_LIST_NAMES {
            let list_id = ListId::from_raw(alloc(&mut state));
            state.lists.insert(
                list_id,
                ListRecord {
                    name: list_name.to_owned(),
                    board_id: Some(id),
                },
            );
            state.access.insert(
                (ObjectKind::List, list_id.value(), owner),
                AccessType::READ_WRITE,
            );
        }
        state
            .access
            .insert((ObjectKind::Board, id.value(), owner), AccessType::READ_WRITE);
        Ok(assemble_board(&state, id, name))
    }

    fn rename_board(&self, id: BoardId, name: &str) -> StoreResult<Board> {
        let mut state = self.write()?;
        let entry = state.boards.get_mut(&id).ok_or(StoreError::NotFound)?;
        name.clone_into(entry);
        Ok(assemble_board(&state, id, name))
    }

    fn find_board(&self, id: BoardId) -> StoreResult<Option<Board>> {
        let state = self.read()?;
        Ok(state
            .boards
            .get(&id)
            .map(|name| assemble_board(&state, id, name)))
    }

    fn find_board_by_name(&self, name: &str) -> StoreResult<Option<Board>> {
        let state = self.read()?;
        Ok(state
            .boards
            .iter()
            .find(|(_, board_name)| board_name.as_str() == name)
            .map(|(id, board_name)| assemble_board(&state, *id, board_name)))
    }

    fn all_boards(&self) -> StoreResult<Vec<Board>> {
        let state = self.read()?;
        Ok(state
            .boards
            .iter()
            .map(|(id, name)| assemble_board(&state, *id, name))
            .collect())
    }

    fn delete_board(&self, id: BoardId) -> StoreResult<()> {
        let mut state = self.write()?;
        state.boards.remove(&id).ok_or(StoreError::NotFound)?;
        let list_ids: Vec<ListId> = state
            .lists
            .iter()
            .filter(|(_, record)| record.board_id == Some(id))
            .map(|(list_id, _)| *list_id)
            .collect();
        for list_id in list_ids {
            purge_list(&mut state, list_id);
        }
        state.access.retain(|(kind, object_id, _), _| {
            !(*kind == ObjectKind::Board && *object_id == id.value())
        });
        Ok(())
    }
}

impl ListStore for InMemoryStore {
    fn insert_list(&self, name: &str, board_id: BoardId, owner: UserId) -> StoreResult<CardsList> {
        let mut state = self.write()?;
        let id = ListId::from_raw(alloc(&mut state));
        let record = ListRecord {
            name: name.to_owned(),
            board_id: Some(board_id),
        };
        state.lists.insert(id, record.clone());
        state.access.insert(
            (ObjectKind::List, id.value(), owner),
            AccessType::READ_WRITE,
        );
        Ok(assemble_list(&state, id, &record))
    }

    fn update_list(
        &self,
        id: ListId,
        name: Option<&str>,
        board_id: Option<BoardId>,
    ) -> StoreResult<CardsList> {
        let mut state = self.write()?;
        let record = state.lists.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(name) = name {
            name.clone_into(&mut record.name);
        }
        if let Some(board_id) = board_id {
            record.board_id = Some(board_id);
        }
        let record = record.clone();
        Ok(assemble_list(&state, id, &record))
    }

    fn find_list(&self, id: ListId) -> StoreResult<Option<CardsList>> {
        let state = self.read()?;
        Ok(state
            .lists
            .get(&id)
            .map(|record| assemble_list(&state, id, record)))
    }

    fn find_list_by_name(&self, name: &str) -> StoreResult<Option<CardsList>> {
        let state = self.read()?;
        Ok(state
            .lists
            .iter()
            .find(|(_, record)| record.name == name)
            .map(|(id, record)| assemble_list(&state, *id, record)))
    }

    fn lists_in_board(&self, board_id: BoardId) -> StoreResult<Vec<CardsList>> {
        let state = self.read()?;
        Ok(state
            .lists
            .iter()
            .filter(|(_, record)| record.board_id == Some(board_id))
            .map(|(id, record)| assemble_list(&state, *id, record))
            .collect())
    }

    fn all_lists(&self) -> StoreResult<Vec<CardsList>> {
        let state = self.read()?;
        Ok(state
            .lists
            .iter()
            .map(|(id, record)| assemble_list(&state, *id, record))
            .collect())
    }

    fn delete_list(&self, id: ListId) -> StoreResult<()> {
        let mut state = self.write()?;
        if !state.lists.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        purge_list(&mut state, id);
        Ok(())
    }

    fn archived_list_id(&self) -> ListId {
        self.archived_list_id
    }
}

impl CardStore for InMemoryStore {
    fn insert_card(&self, card: NewCard, tags: &[TagId], children: &[CardId]) -> StoreResult<Card> {
        let mut state = self.write()?;
        let id = CardId::from_raw(alloc(&mut state));
        let record = CardRecord {
            name: card.name,
            description: card.description,
            user_id: card.user_id,
            assignee_id: card.assignee_id,
            expiration_date: card.expiration_date,
            priority: card.priority,
            list_id: card.list_id,
            created_at: card.created_at,
            last_modified_at: card.last_modified_at,
        };
        state.cards.insert(id, record.clone());
        for tag_id in tags {
            state.card_tags.insert((id, *tag_id));
        }
        for child_id in children {
            state.card_children.insert((id, *child_id));
        }
        Ok(assemble_card(&state, id, &record))
    }

    fn update_card(&self, card: &Card) -> StoreResult<Card> {
        let mut state = self.write()?;
        if !state.cards.contains_key(&card.id) {
            return Err(StoreError::NotFound);
        }
        let record = CardRecord {
            name: card.name.clone(),
            description: card.description.clone(),
            user_id: card.user_id,
            assignee_id: card.assignee_id,
            expiration_date: card.expiration_date,
            priority: card.priority,
            list_id: card.list_id,
            created_at: card.created_at,
            last_modified_at: card.last_modified_at,
        };
        state.cards.insert(card.id, record.clone());
        state.card_tags.retain(|(card_id, _)| *card_id != card.id);
        state
            .card_children
            .retain(|(parent, _)| *parent != card.id);
        for tag_id in &card.tags {
            state.card_tags.insert((card.id, *tag_id));
        }
        for child_id in &card.children {
            state.card_children.insert((card.id, *child_id));
        }
        Ok(assemble_card(&state, card.id, &record))
    }

    fn find_card(&self, id: CardId) -> StoreResult<Option<Card>> {
        let state = self.read()?;
        Ok(state
            .cards
            .get(&id)
            .map(|record| assemble_card(&state, id, record)))
    }

    fn cards_in_list(&self, list_id: ListId) -> StoreResult<Vec<Card>> {
        let state = self.read()?;
        Ok(state
            .cards
            .iter()
            .filter(|(_, record)| record.list_id == list_id)
            .map(|(id, record)| assemble_card(&state, *id, record))
            .collect())
    }

    fn cards_with_tag(&self, tag_id: TagId) -> StoreResult<Vec<Card>> {
        let state = self.read()?;
        Ok(state
            .card_tags
            .iter()
            .filter(|(_, linked)| *linked == tag_id)
            .filter_map(|(card_id, _)| {
                state
                    .cards
                    .get(card_id)
                    .map(|record| assemble_card(&state, *card_id, record))
            })
            .collect())
    }

    fn all_cards(&self) -> StoreResult<Vec<Card>> {
        let state = self.read()?;
        Ok(state
            .cards
            .iter()
            .map(|(id, record)| assemble_card(&state, *id, record))
            .collect())
    }

    fn delete_card(&self, id: CardId) -> StoreResult<()> {
        let mut state = self.write()?;
        if !state.cards.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        purge_card(&mut state, id);
        Ok(())
    }
}

impl TagStore for InMemoryStore {
    fn insert_tag(&self, name: &str, color: Option<i32>) -> StoreResult<Tag> {
        let mut state = self.write()?;
        let id = TagId::from_raw(alloc(&mut state));
        let tag = Tag {
            id,
            name: name.to_owned(),
            color,
        };
        state.tags.insert(id, tag.clone());
        Ok(tag)
    }

    fn update_tag(&self, tag: &Tag) -> StoreResult<Tag> {
        let mut state = self.write()?;
        if !state.tags.contains_key(&tag.id) {
            return Err(StoreError::NotFound);
        }
        state.tags.insert(tag.id, tag.clone());
        Ok(tag.clone())
    }

    fn find_tag(&self, id: TagId) -> StoreResult<Option<Tag>> {
        Ok(self.read()?.tags.get(&id).cloned())
    }

    fn find_tag_by_name(&self, name: &str) -> StoreResult<Option<Tag>> {
        Ok(self
            .read()?
            .tags
            .values()
            .find(|tag| tag.name == name)
            .cloned())
    }

    fn all_tags(&self) -> StoreResult<Vec<Tag>> {
        Ok(self.read()?.tags.values().cloned().collect())
    }

    fn delete_tag(&self, id: TagId) -> StoreResult<()> {
        let mut state = self.write()?;
        state.tags.remove(&id).ok_or(StoreError::NotFound)?;
        state.card_tags.retain(|(_, tag_id)| *tag_id != id);
        Ok(())
    }
}

impl PlanStore for InMemoryStore {
    fn insert_plan(
        &self,
        card_id: CardId,
        interval: Duration,
        last_created_at: DateTime<Utc>,
    ) -> StoreResult<Plan> {
        let mut state = self.write()?;
        let id = PlanId::from_raw(alloc(&mut state));
        let plan = Plan {
            id,
            card_id,
            interval,
            last_created_at,
        };
        state.plans.insert(id, plan.clone());
        Ok(plan)
    }

    fn update_plan(&self, plan: &Plan) -> StoreResult<Plan> {
        let mut state = self.write()?;
        if !state.plans.contains_key(&plan.id) {
            return Err(StoreError::NotFound);
        }
        state.plans.insert(plan.id, plan.clone());
        Ok(plan.clone())
    }

    fn find_plan_by_card(&self, card_id: CardId) -> StoreResult<Option<Plan>> {
        Ok(self
            .read()?
            .plans
            .values()
            .find(|plan| plan.card_id == card_id)
            .cloned())
    }

    fn all_plans(&self) -> StoreResult<Vec<Plan>> {
        Ok(self.read()?.plans.values().cloned().collect())
    }

    fn set_plan_last_created(
        &self,
        id: PlanId,
        last_created_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut state = self.write()?;
        let plan = state.plans.get_mut(&id).ok_or(StoreError::NotFound)?;
        plan.last_created_at = last_created_at;
        Ok(())
    }

    fn delete_plan(&self, id: PlanId) -> StoreResult<()> {
        self.write()?.plans.remove(&id).ok_or(StoreError::NotFound)?;
        Ok(())
    }
}

impl AccessStore for InMemoryStore {
    fn access_row(
        &self,
        kind: ObjectKind,
        object_id: i64,
        user_id: UserId,
    ) -> StoreResult<Option<AccessType>> {
        Ok(self.read()?.access.get(&(kind, object_id, user_id)).copied())
    }

    fn set_access(
        &self,
        kind: ObjectKind,
        object_id: i64,
        user_id: UserId,
        access: AccessType,
    ) -> StoreResult<()> {
        self.write()?.access.insert((kind, object_id, user_id), access);
        Ok(())
    }
}
