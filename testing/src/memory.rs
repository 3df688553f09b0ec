//! In-memory stores.
//!
//! [`InMemoryBookstore`] keeps every table in one mutex-guarded value and
//! implements all store traits against it. Orderings, filters, totals and
//! error variants follow the `PostgreSQL` stores:
//!
//! - listing totals are computed over the same filter as the page
//! - a missing category row yields `None` category fields
//! - a book without an inventory row is out of stock
//! - order creation either commits every item or changes nothing
//!
//! Clones share the same tables.

use crate::mocks::test_clock;
use async_trait::async_trait;
use bookstore_core::book::{
    Book, BookDetail, BookQuery, BookWithCategory, RELATED_BOOKS_LIMIT, RelatedBook, RelationType,
    discount_rate,
};
use bookstore_core::carousel::Carousel;
use bookstore_core::category::{Category, CategoryNode, build_tree};
use bookstore_core::environment::Clock;
use bookstore_core::order::{
    NewOrder, Order, OrderDetail, OrderItem, OrderStatus, OrderStatusFilter, OrderSummary,
    ShippingAddress, TransitionPolicy,
};
use bookstore_core::pagination::check_limit;
use bookstore_core::store::{
    BookStore, CarouselStore, CategoryStore, FavoriteStore, OrderStore, ReadinessProbe, UserStore,
};
use bookstore_core::user::{
    NewUser, ProfileUpdate, SIGNUP_POINTS, UserAddress, UserCredentials, UserProfile, UserStats,
    validate_email, validate_username,
};
use bookstore_core::{DateTime, Decimal, Page, Pagination, StoreError, Utc, check_text};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
struct StoredUser {
    profile: UserProfile,
    password_hash: String,
}

#[derive(Debug, Clone, Copy)]
struct Relation {
    book_id: i64,
    related_book_id: i64,
    relation_type: RelationType,
}

#[derive(Debug, Clone, Copy)]
struct Favorite {
    user_id: i64,
    book_id: i64,
    created_at: DateTime<Utc>,
}

#[derive(Debug)]
struct Tables {
    categories: BTreeMap<i64, Category>,
    books: BTreeMap<i64, Book>,
    inventory: HashMap<i64, i32>,
    relations: Vec<Relation>,
    users: BTreeMap<i64, StoredUser>,
    addresses: BTreeMap<i64, UserAddress>,
    orders: BTreeMap<i64, Order>,
    order_items: BTreeMap<i64, OrderItem>,
    favorites: Vec<Favorite>,
    carousels: BTreeMap<i64, Carousel>,
    next_user_id: i64,
    next_order_id: i64,
    next_item_id: i64,
    ready: bool,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            categories: BTreeMap::new(),
            books: BTreeMap::new(),
            inventory: HashMap::new(),
            relations: Vec::new(),
            users: BTreeMap::new(),
            addresses: BTreeMap::new(),
            orders: BTreeMap::new(),
            order_items: BTreeMap::new(),
            favorites: Vec::new(),
            carousels: BTreeMap::new(),
            next_user_id: 1,
            next_order_id: 1,
            next_item_id: 1,
            ready: true,
        }
    }
}

impl Tables {
    fn listing(&self, book: &Book) -> BookWithCategory {
        let category = self.categories.get(&book.category_id);
        BookWithCategory {
            book: book.clone(),
            category_name: category.map(|c| c.name.clone()),
            category_slug: category.map(|c| c.slug.clone()),
        }
    }

    fn stock(&self, book_id: i64) -> i32 {
        self.inventory.get(&book_id).copied().unwrap_or(0)
    }

    fn related_books(&self, book_id: i64) -> Vec<RelatedBook> {
        let mut related: Vec<(RelationType, &Book)> = self
            .relations
            .iter()
            .filter(|r| r.book_id == book_id && r.related_book_id != book_id)
            .filter_map(|r| self.books.get(&r.related_book_id).map(|b| (r.relation_type, b)))
            .collect();
        related.sort_by(|(ta, a), (tb, b)| {
            tb.as_str().cmp(ta.as_str()).then_with(|| a.id.cmp(&b.id))
        });

        related
            .into_iter()
            .take(usize::try_from(RELATED_BOOKS_LIMIT).unwrap_or_default())
            .map(|(relation_type, book)| RelatedBook {
                id: book.id,
                title: book.title.clone(),
                author: book.author.clone(),
                cover_image: book.cover_image.clone(),
                selling_price: book.selling_price,
                relation_type,
            })
            .collect()
    }

    fn featured(
        &self,
        limit: i64,
        flag: impl Fn(&Book) -> bool,
        compare: impl Fn(&Book, &Book) -> std::cmp::Ordering,
    ) -> Result<Vec<BookWithCategory>, StoreError> {
        let limit = check_limit(limit)?;
        let mut books: Vec<&Book> = self.books.values().filter(|b| flag(b)).collect();
        books.sort_by(|a, b| compare(a, b));
        Ok(books
            .into_iter()
            .take(usize::try_from(limit).unwrap_or_default())
            .map(|b| self.listing(b))
            .collect())
    }

    fn shipping_address(&self, address_id: Option<i64>) -> ShippingAddress {
        address_id
            .and_then(|id| self.addresses.get(&id))
            .map(|a| ShippingAddress {
                recipient_name: Some(a.recipient_name.clone()),
                recipient_phone: Some(a.recipient_phone.clone()),
                province: Some(a.province.clone()),
                city: Some(a.city.clone()),
                district: Some(a.district.clone()),
                detail_address: Some(a.detail_address.clone()),
            })
            .unwrap_or_default()
    }

    fn order_detail(&self, order_id: i64) -> Option<OrderDetail> {
        let order = self.orders.get(&order_id)?;
        let items = self
            .order_items
            .values()
            .filter(|item| item.order_id == order_id)
            .map(|item| {
                let book = self.books.get(&item.book_id);
                OrderItem {
                    title: book.map(|b| b.title.clone()),
                    cover_image: book.map(|b| b.cover_image.clone()),
                    ..item.clone()
                }
            })
            .collect();

        Some(OrderDetail {
            order: order.clone(),
            address: self.shipping_address(order.address_id),
            items,
        })
    }

    fn check_unique(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        except: Option<i64>,
    ) -> Result<(), StoreError> {
        let others = self
            .users
            .values()
            .filter(|u| Some(u.profile.id) != except)
            .map(|u| &u.profile);
        for other in others {
            if username.is_some_and(|name| other.username == name) {
                return Err(StoreError::conflict("username already exists"));
            }
            if email.is_some_and(|email| other.email.as_deref() == Some(email)) {
                return Err(StoreError::conflict("email already exists"));
            }
        }
        Ok(())
    }

    fn user_mut(&mut self, user_id: i64) -> Result<&mut StoredUser, StoreError> {
        self.users
            .get_mut(&user_id)
            .ok_or_else(|| StoreError::not_found("User", user_id))
    }
}

fn missing_reference(constraint: &str) -> StoreError {
    StoreError::validation(format!("referenced record does not exist ({constraint})"))
}

fn paginate<T>(items: Vec<T>, pagination: Pagination) -> Page<T> {
    let total = i64::try_from(items.len()).unwrap_or(i64::MAX);
    let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(pagination.limit()).unwrap_or_default();
    let items = items.into_iter().skip(offset).take(limit).collect();
    Page::new(items, total)
}

/// Every store of the bookstore, backed by process memory.
///
/// # Examples
///
/// ```
/// use bookstore_testing::{InMemoryBookstore, fixtures};
///
/// let store = InMemoryBookstore::new().with_reserve_stock(false);
/// store.insert_book(fixtures::book(1, "Dune", 1));
/// store.set_inventory(1, 3);
/// assert_eq!(store.inventory(1), Some(3));
/// ```
#[derive(Clone)]
pub struct InMemoryBookstore {
    tables: Arc<Mutex<Tables>>,
    clock: Arc<dyn Clock>,
    reserve_stock: bool,
    transition_policy: TransitionPolicy,
}

impl Default for InMemoryBookstore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBookstore {
    /// Empty tables, stock reservation on, permissive status transitions
    /// and a fixed clock at the test epoch.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::default())),
            clock: Arc::new(test_clock()),
            reserve_stock: true,
            transition_policy: TransitionPolicy::Permissive,
        }
    }

    /// Use another clock for write timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Enable or disable inventory decrements on order creation.
    #[must_use]
    pub const fn with_reserve_stock(mut self, reserve_stock: bool) -> Self {
        self.reserve_stock = reserve_stock;
        self
    }

    /// Set the order status transition policy.
    #[must_use]
    pub const fn with_transition_policy(mut self, policy: TransitionPolicy) -> Self {
        self.transition_policy = policy;
        self
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add or replace a category.
    pub fn insert_category(&self, category: Category) {
        self.tables().categories.insert(category.id, category);
    }

    /// Add or replace a book. Inventory is seeded separately.
    pub fn insert_book(&self, book: Book) {
        self.tables().books.insert(book.id, book);
    }

    /// Set the inventory quantity of a book.
    pub fn set_inventory(&self, book_id: i64, quantity: i32) {
        self.tables().inventory.insert(book_id, quantity);
    }

    /// Current inventory quantity, `None` without an inventory row.
    #[must_use]
    pub fn inventory(&self, book_id: i64) -> Option<i32> {
        self.tables().inventory.get(&book_id).copied()
    }

    /// Record that `related_book_id` is related to `book_id`.
    pub fn relate(&self, book_id: i64, related_book_id: i64, relation_type: RelationType) {
        self.tables().relations.push(Relation {
            book_id,
            related_book_id,
            relation_type,
        });
    }

    /// Add a user with an explicit id and password digest.
    pub fn insert_user(&self, id: i64, username: &str, password_hash: &str) -> UserProfile {
        let created_at = self.clock.now();
        let mut tables = self.tables();
        let profile = UserProfile {
            id,
            username: username.to_string(),
            email: None,
            phone: None,
            nickname: None,
            bio: None,
            avatar_url: None,
            gender: None,
            birth_date: None,
            points: SIGNUP_POINTS,
            created_at,
            updated_at: None,
        };
        tables.users.insert(
            id,
            StoredUser {
                profile: profile.clone(),
                password_hash: password_hash.to_string(),
            },
        );
        tables.next_user_id = tables.next_user_id.max(id + 1);
        profile
    }

    /// Add or replace a saved address.
    pub fn insert_address(&self, address: UserAddress) {
        self.tables().addresses.insert(address.id, address);
    }

    /// Add or replace a carousel slide.
    pub fn insert_carousel(&self, carousel: Carousel) {
        self.tables().carousels.insert(carousel.id, carousel);
    }

    /// Make [`ReadinessProbe::ping`] succeed or fail.
    pub fn set_ready(&self, ready: bool) {
        self.tables().ready = ready;
    }

    /// Number of stored orders.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.tables().orders.len()
    }

    /// Number of stored order items across all orders.
    #[must_use]
    pub fn order_item_count(&self) -> usize {
        self.tables().order_items.len()
    }
}

#[async_trait]
impl BookStore for InMemoryBookstore {
    async fn list_books(&self, query: &BookQuery) -> Result<Page<BookWithCategory>, StoreError> {
        query.validate()?;
        let tables = self.tables();

        let sort = query.sort();
        let mut matching: Vec<&Book> = tables.books.values().filter(|b| query.matches(b)).collect();
        matching.sort_by(|a, b| sort.compare(a, b));

        let listings: Vec<BookWithCategory> =
            matching.into_iter().map(|b| tables.listing(b)).collect();
        Ok(paginate(listings, query.pagination()))
    }

    async fn get_book(&self, id: i64) -> Result<Option<BookDetail>, StoreError> {
        let tables = self.tables();
        let Some(book) = tables.books.get(&id) else {
            return Ok(None);
        };

        Ok(Some(BookDetail {
            listing: tables.listing(book),
            stock: tables.stock(id),
            discount_rate: discount_rate(book.original_price, book.selling_price),
            related_books: tables.related_books(id),
        }))
    }

    async fn hot_books(&self, limit: i64) -> Result<Vec<BookWithCategory>, StoreError> {
        self.tables().featured(
            limit,
            |b| b.is_hot,
            |a, b| b.sales_volume.cmp(&a.sales_volume).then_with(|| b.id.cmp(&a.id)),
        )
    }

    async fn new_books(&self, limit: i64) -> Result<Vec<BookWithCategory>, StoreError> {
        self.tables().featured(
            limit,
            |b| b.is_new,
            |a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)),
        )
    }
}

fn active_sorted(tables: &Tables) -> Vec<&Category> {
    let mut categories: Vec<&Category> = tables.categories.values().filter(|c| c.is_active).collect();
    categories.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });
    categories
}

#[async_trait]
impl CategoryStore for InMemoryBookstore {
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(active_sorted(&self.tables()).into_iter().cloned().collect())
    }

    async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>, StoreError> {
        check_text("slug", slug)?;
        Ok(self
            .tables()
            .categories
            .values()
            .find(|c| c.is_active && c.slug == slug)
            .cloned())
    }

    async fn category_by_id(&self, id: i64) -> Result<Option<Category>, StoreError> {
        Ok(self
            .tables()
            .categories
            .get(&id)
            .filter(|c| c.is_active)
            .cloned())
    }

    async fn category_tree(&self) -> Result<Vec<CategoryNode>, StoreError> {
        let tables = self.tables();
        let entries = active_sorted(&tables)
            .into_iter()
            .map(|category| {
                let parent_name = category
                    .parent_id
                    .and_then(|id| tables.categories.get(&id))
                    .filter(|parent| parent.is_active)
                    .map(|parent| parent.name.clone());
                (category.clone(), parent_name)
            })
            .collect();
        Ok(build_tree(entries))
    }
}

#[async_trait]
impl OrderStore for InMemoryBookstore {
    async fn create_order(&self, order: &NewOrder) -> Result<OrderDetail, StoreError> {
        order.validate()?;
        let now = self.clock.now();
        let mut tables = self.tables();

        if !tables.users.contains_key(&order.user_id) {
            return Err(missing_reference("orders_user_id_fkey"));
        }
        if order
            .address_id
            .is_some_and(|id| !tables.addresses.contains_key(&id))
        {
            return Err(missing_reference("orders_address_id_fkey"));
        }

        // Stage inventory changes; nothing is written until every item passes.
        let mut staged = tables.inventory.clone();
        for item in &order.items {
            if !tables.books.contains_key(&item.book_id) {
                return Err(missing_reference("order_items_book_id_fkey"));
            }
            if self.reserve_stock {
                match staged.get_mut(&item.book_id) {
                    Some(quantity) if *quantity >= item.quantity => *quantity -= item.quantity,
                    _ => {
                        return Err(StoreError::conflict(format!(
                            "insufficient stock for book {}",
                            item.book_id
                        )));
                    }
                }
            }
        }

        let order_id = tables.next_order_id;
        tables.next_order_id += 1;
        tables.orders.insert(
            order_id,
            Order {
                id: order_id,
                user_id: order.user_id,
                total_amount: order.total_amount,
                final_amount: order.final_amount,
                address_id: order.address_id,
                status: OrderStatus::Pending,
                created_at: now,
                updated_at: None,
            },
        );
        for item in &order.items {
            let item_id = tables.next_item_id;
            tables.next_item_id += 1;
            tables.order_items.insert(
                item_id,
                OrderItem {
                    id: item_id,
                    order_id,
                    book_id: item.book_id,
                    quantity: item.quantity,
                    price: item.price,
                    title: None,
                    cover_image: None,
                },
            );
        }
        tables.inventory = staged;

        tracing::debug!(order_id, user_id = order.user_id, items = order.items.len(), "Order created");

        tables
            .order_detail(order_id)
            .ok_or_else(|| StoreError::database(format!("order {order_id} missing after insert")))
    }

    async fn get_order(&self, order_id: i64) -> Result<Option<OrderDetail>, StoreError> {
        Ok(self.tables().order_detail(order_id))
    }

    async fn update_order_status(
        &self,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<OrderStatus, StoreError> {
        let now = self.clock.now();
        let mut tables = self.tables();
        let order = tables
            .orders
            .get_mut(&order_id)
            .ok_or_else(|| StoreError::not_found("Order", order_id))?;

        let previous = order.status;
        if !self.transition_policy.check(order_id, previous, status)? {
            tracing::warn!(order_id, from = %previous, to = %status, "Status change outside the lifecycle");
        }
        order.status = status;
        order.updated_at = Some(now);

        Ok(previous)
    }

    async fn list_user_orders(
        &self,
        user_id: i64,
        filter: OrderStatusFilter,
        pagination: Pagination,
    ) -> Result<Page<OrderSummary>, StoreError> {
        let tables = self.tables();
        let mut orders: Vec<&Order> = tables
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .filter(|o| filter.status().is_none_or(|status| o.status == status))
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));

        let summaries: Vec<OrderSummary> = orders
            .into_iter()
            .map(|order| OrderSummary {
                order: order.clone(),
                recipient_name: order
                    .address_id
                    .and_then(|id| tables.addresses.get(&id))
                    .map(|a| a.recipient_name.clone()),
            })
            .collect();
        Ok(paginate(summaries, pagination))
    }
}

#[async_trait]
impl UserStore for InMemoryBookstore {
    async fn create_user(&self, user: &NewUser) -> Result<UserProfile, StoreError> {
        validate_username(&user.username)?;
        if let Some(email) = &user.email {
            validate_email(email)?;
        }
        let username = user.username.trim();
        let email = user.email.as_deref().map(str::trim);
        let created_at = self.clock.now();

        let mut tables = self.tables();
        tables.check_unique(Some(username), email, None)?;

        let id = tables.next_user_id;
        tables.next_user_id += 1;
        let profile = UserProfile {
            id,
            username: username.to_string(),
            email: email.map(str::to_string),
            phone: None,
            nickname: None,
            bio: None,
            avatar_url: None,
            gender: None,
            birth_date: None,
            points: SIGNUP_POINTS,
            created_at,
            updated_at: None,
        };
        tables.users.insert(
            id,
            StoredUser {
                profile: profile.clone(),
                password_hash: user.password_hash.clone(),
            },
        );
        Ok(profile)
    }

    async fn find_credentials(&self, username: &str) -> Result<Option<UserCredentials>, StoreError> {
        check_text("username", username)?;
        let username = username.trim();
        Ok(self
            .tables()
            .users
            .values()
            .find(|u| u.profile.username == username)
            .map(|u| UserCredentials {
                id: u.profile.id,
                username: u.profile.username.clone(),
                password_hash: u.password_hash.clone(),
            }))
    }

    async fn find_credentials_by_id(&self, user_id: i64) -> Result<Option<UserCredentials>, StoreError> {
        Ok(self.tables().users.get(&user_id).map(|u| UserCredentials {
            id: u.profile.id,
            username: u.profile.username.clone(),
            password_hash: u.password_hash.clone(),
        }))
    }

    async fn get_profile(&self, user_id: i64) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.tables().users.get(&user_id).map(|u| u.profile.clone()))
    }

    async fn update_profile(&self, user_id: i64, update: &ProfileUpdate) -> Result<UserProfile, StoreError> {
        update.validate()?;
        let username = update.username.as_deref().map(str::trim);
        let email = update.email.as_deref().map(str::trim);
        let now = self.clock.now();

        let mut tables = self.tables();
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::not_found("User", user_id));
        }
        tables.check_unique(username, email, Some(user_id))?;

        let profile = &mut tables.user_mut(user_id)?.profile;
        if let Some(username) = username {
            profile.username = username.to_string();
        }
        if let Some(email) = email {
            profile.email = Some(email.to_string());
        }
        if let Some(nickname) = &update.nickname {
            profile.nickname = Some(nickname.clone());
        }
        if let Some(phone) = &update.phone {
            profile.phone = Some(phone.clone());
        }
        if let Some(bio) = &update.bio {
            profile.bio = Some(bio.clone());
        }
        profile.updated_at = Some(now);
        Ok(profile.clone())
    }

    async fn update_password(&self, user_id: i64, password_hash: &str) -> Result<(), StoreError> {
        let now = self.clock.now();
        let mut tables = self.tables();
        let user = tables.user_mut(user_id)?;
        user.password_hash = password_hash.to_string();
        user.profile.updated_at = Some(now);
        Ok(())
    }

    async fn update_avatar(&self, user_id: i64, avatar_url: &str) -> Result<UserProfile, StoreError> {
        check_text("avatar_url", avatar_url)?;
        let now = self.clock.now();
        let mut tables = self.tables();
        let profile = &mut tables.user_mut(user_id)?.profile;
        profile.avatar_url = Some(avatar_url.to_string());
        profile.updated_at = Some(now);
        Ok(profile.clone())
    }

    async fn list_addresses(&self, user_id: i64) -> Result<Vec<UserAddress>, StoreError> {
        let mut addresses: Vec<UserAddress> = self
            .tables()
            .addresses
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        addresses.sort_by(|a, b| b.is_default.cmp(&a.is_default).then_with(|| a.id.cmp(&b.id)));
        Ok(addresses)
    }

    async fn user_stats(&self, user_id: i64) -> Result<UserStats, StoreError> {
        let tables = self.tables();
        let orders: Vec<&Order> = tables.orders.values().filter(|o| o.user_id == user_id).collect();
        let favorites = tables.favorites.iter().filter(|f| f.user_id == user_id).count();

        Ok(UserStats {
            order_total: i64::try_from(orders.len()).unwrap_or(i64::MAX),
            favorite_total: i64::try_from(favorites).unwrap_or(i64::MAX),
            spend_total: orders.iter().map(|o| o.final_amount).sum::<Decimal>(),
        })
    }
}

#[async_trait]
impl FavoriteStore for InMemoryBookstore {
    async fn list_favorites(
        &self,
        user_id: i64,
        pagination: Pagination,
    ) -> Result<Page<BookWithCategory>, StoreError> {
        let tables = self.tables();
        let mut favorites: Vec<(&Favorite, &Book)> = tables
            .favorites
            .iter()
            .filter(|f| f.user_id == user_id)
            .filter_map(|f| tables.books.get(&f.book_id).map(|b| (f, b)))
            .collect();
        favorites.sort_by(|(fa, _), (fb, _)| {
            fb.created_at
                .cmp(&fa.created_at)
                .then_with(|| fb.book_id.cmp(&fa.book_id))
        });

        let listings: Vec<BookWithCategory> =
            favorites.into_iter().map(|(_, b)| tables.listing(b)).collect();
        Ok(paginate(listings, pagination))
    }

    async fn add_favorite(&self, user_id: i64, book_id: i64) -> Result<(), StoreError> {
        let created_at = self.clock.now();
        let mut tables = self.tables();
        if !tables.books.contains_key(&book_id) {
            return Err(StoreError::not_found("Book", book_id));
        }
        if !tables.users.contains_key(&user_id) {
            return Err(missing_reference("favorites_user_id_fkey"));
        }
        if tables
            .favorites
            .iter()
            .any(|f| f.user_id == user_id && f.book_id == book_id)
        {
            return Ok(());
        }
        tables.favorites.push(Favorite {
            user_id,
            book_id,
            created_at,
        });
        Ok(())
    }

    async fn remove_favorite(&self, user_id: i64, book_id: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables();
        let before = tables.favorites.len();
        tables
            .favorites
            .retain(|f| !(f.user_id == user_id && f.book_id == book_id));
        Ok(tables.favorites.len() < before)
    }
}

#[async_trait]
impl CarouselStore for InMemoryBookstore {
    async fn list_carousels(&self) -> Result<Vec<Carousel>, StoreError> {
        let mut slides: Vec<Carousel> = self.tables().carousels.values().cloned().collect();
        slides.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.id.cmp(&b.id)));
        Ok(slides)
    }
}

#[async_trait]
impl ReadinessProbe for InMemoryBookstore {
    async fn ping(&self) -> Result<(), StoreError> {
        if self.tables().ready {
            Ok(())
        } else {
            Err(StoreError::database("in-memory store marked unavailable"))
        }
    }
}
