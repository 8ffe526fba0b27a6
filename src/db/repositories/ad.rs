use anyhow::{Context, Result};
use async_trait::async_trait;
use sea_orm::sea_query::{Expr, LikeExpr, SimpleExpr};
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::SearchOrder;
use crate::domain::{AdId, CategoryId};
use crate::entities::{ad_tags, ads, categories, prelude::*, tags, users};
use crate::models::ad::{AdRecord, AdWrite, TextSearch};
use crate::models::catalog::{Category, Tag};
use crate::models::user::User;
use crate::ports::AdRepository;

/// Escapes LIKE wildcards so user input only ever matches literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Haystack stored in `ads.search_text`.
///
/// Folding happens here rather than in SQL because SQLite's `LOWER` only
/// knows ASCII.
pub fn search_text(title: &str, description: &str) -> String {
    format!("{}\n{}", title.to_lowercase(), description.to_lowercase())
}

/// `search_text LIKE '%q%'` with `q` folded the same way as the column.
fn text_condition(query: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&query.to_lowercase()));
    Expr::col((ads::Entity, ads::Column::SearchText)).like(LikeExpr::new(pattern).escape('\\'))
}

fn active_model(ad: &AdWrite) -> ads::ActiveModel {
    ads::ActiveModel {
        id: Set(ad.id.value()),
        title: Set(ad.title.clone()),
        description: Set(ad.description.clone()),
        owner_id: Set(ad.owner_id.value()),
        price: Set(ad.price),
        weight_grams: Set(ad.weight_grams),
        picture: Set(ad.picture.clone()),
        location: Set(ad.location.clone()),
        category_id: Set(ad.category_id.value()),
        created_at: Set(ad.created_at.clone()),
        search_text: Set(search_text(&ad.title, &ad.description)),
    }
}

pub struct SeaOrmAdRepository {
    conn: DatabaseConnection,
}

impl SeaOrmAdRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Ads::find().count(&self.conn).await?)
    }

    /// Resolves owner, category and tags for a page of rows with one query
    /// per relation. Row order is preserved.
    async fn hydrate(&self, rows: Vec<ads::Model>) -> Result<Vec<AdRecord>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let owner_ids: HashSet<i32> = rows.iter().map(|r| r.owner_id).collect();
        let category_ids: HashSet<i32> = rows.iter().map(|r| r.category_id).collect();
        let ad_ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

        let (owners, categories, links) = tokio::try_join!(
            users::Entity::find()
                .filter(users::Column::Id.is_in(owner_ids))
                .all(&self.conn),
            Categories::find()
                .filter(categories::Column::Id.is_in(category_ids))
                .all(&self.conn),
            AdTags::find()
                .filter(ad_tags::Column::AdId.is_in(ad_ids))
                .all(&self.conn),
        )?;

        let tag_ids: HashSet<i32> = links.iter().map(|l| l.tag_id).collect();
        let tags: HashMap<i32, Tag> = if tag_ids.is_empty() {
            HashMap::new()
        } else {
            Tags::find()
                .filter(tags::Column::Id.is_in(tag_ids))
                .all(&self.conn)
                .await?
                .into_iter()
                .map(|t| (t.id, Tag::from(t)))
                .collect()
        };

        let owners: HashMap<i32, User> = owners.into_iter().map(|u| (u.id, User::from(u))).collect();
        let categories: HashMap<i32, Category> = categories
            .into_iter()
            .map(|c| (c.id, Category::from(c)))
            .collect();

        let mut tags_by_ad: HashMap<Uuid, Vec<Tag>> = HashMap::new();
        for link in links {
            if let Some(tag) = tags.get(&link.tag_id) {
                tags_by_ad.entry(link.ad_id).or_default().push(tag.clone());
            }
        }

        rows.into_iter()
            .map(|row| {
                let owner = owners
                    .get(&row.owner_id)
                    .cloned()
                    .with_context(|| format!("Ad {} references missing user {}", row.id, row.owner_id))?;
                let category = categories.get(&row.category_id).cloned().with_context(|| {
                    format!("Ad {} references missing category {}", row.id, row.category_id)
                })?;
                let mut tags = tags_by_ad.remove(&row.id).unwrap_or_default();
                tags.sort_by_key(|t| t.id);

                Ok(AdRecord {
                    id: AdId::from(row.id),
                    title: row.title,
                    description: row.description,
                    owner,
                    price: row.price,
                    weight_grams: row.weight_grams,
                    picture: row.picture,
                    location: row.location,
                    created_at: row.created_at,
                    category,
                    tags,
                })
            })
            .collect()
    }
}

/// Swaps the ad's tag links for `ad.tag_ids` inside the caller's transaction.
async fn replace_tag_links<C: ConnectionTrait>(conn: &C, ad: &AdWrite) -> Result<()> {
    let id = ad.id.value();
    let tag_ids: BTreeSet<i32> = ad.tag_ids.iter().map(|t| t.value()).collect();

    AdTags::delete_many()
        .filter(ad_tags::Column::AdId.eq(id))
        .exec(conn)
        .await?;

    if !tag_ids.is_empty() {
        let links = tag_ids.iter().map(|tag_id| ad_tags::ActiveModel {
            ad_id: Set(id),
            tag_id: Set(*tag_id),
        });
        AdTags::insert_many(links).exec_without_returning(conn).await?;
    }

    Ok(())
}

#[async_trait]
impl AdRepository for SeaOrmAdRepository {
    async fn find_by_id(&self, id: AdId) -> Result<Option<AdRecord>> {
        let Some(row) = Ads::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query ad by ID")?
        else {
            return Ok(None);
        };

        Ok(self.hydrate(vec![row]).await?.pop())
    }

    async fn search_by_text(&self, query: &str, options: TextSearch) -> Result<Vec<AdRecord>> {
        let mut select = Ads::find().filter(text_condition(query));

        select = match options.order {
            SearchOrder::Unordered => select,
            SearchOrder::Newest => select.order_by_desc(ads::Column::CreatedAt),
            SearchOrder::Oldest => select.order_by_asc(ads::Column::CreatedAt),
        };

        let rows = select
            .limit(options.limit)
            .all(&self.conn)
            .await
            .context("Failed to search ads")?;

        debug!(query, rows = rows.len(), "Text search executed");
        self.hydrate(rows).await
    }

    async fn list_recent(&self, category: Option<CategoryId>, limit: u64) -> Result<Vec<AdRecord>> {
        let mut select = Ads::find();
        if let Some(category) = category {
            select = select.filter(ads::Column::CategoryId.eq(category.value()));
        }

        let rows = select
            .order_by_desc(ads::Column::CreatedAt)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to list ads")?;

        self.hydrate(rows).await
    }

    async fn insert(&self, ad: &AdWrite) -> Result<AdRecord> {
        let txn = self.conn.begin().await?;

        Ads::insert(active_model(ad))
            .exec_without_returning(&txn)
            .await
            .context("Failed to insert ad")?;
        replace_tag_links(&txn, ad).await?;

        txn.commit().await?;

        info!("Inserted ad {}: {}", ad.id, ad.title);

        self.find_by_id(ad.id)
            .await?
            .with_context(|| format!("Ad {} missing right after insert", ad.id))
    }

    async fn update(&self, ad: &AdWrite) -> Result<Option<AdRecord>> {
        let mut model = active_model(ad);
        model.id = NotSet;
        model.owner_id = NotSet;
        model.created_at = NotSet;

        let txn = self.conn.begin().await?;

        let result = Ads::update_many()
            .set(model)
            .filter(ads::Column::Id.eq(ad.id.value()))
            .exec(&txn)
            .await
            .context("Failed to update ad")?;

        if result.rows_affected == 0 {
            debug!("Ad {} vanished before update", ad.id);
            return Ok(None);
        }

        replace_tag_links(&txn, ad).await?;
        txn.commit().await?;

        info!("Updated ad {}: {}", ad.id, ad.title);

        self.find_by_id(ad.id).await
    }

    async fn delete(&self, id: AdId) -> Result<bool> {
        let txn = self.conn.begin().await?;

        AdTags::delete_many()
            .filter(ad_tags::Column::AdId.eq(id.value()))
            .exec(&txn)
            .await?;

        let result = Ads::delete_by_id(id.value()).exec(&txn).await?;

        txn.commit().await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed ad with ID: {}", id);
        }
        Ok(removed)
    }
}
