use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ads")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub owner_id: i32,
    pub price: f64,
    pub weight_grams: i32,
    pub picture: String,
    pub location: String,
    pub category_id: i32,
    /// RFC 3339, fixed microsecond precision so string order matches time order.
    pub created_at: String,
    /// Lowercased title and description, the haystack for text search.
    pub search_text: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Owner,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Category,
    #[sea_orm(has_many = "super::ad_tags::Entity")]
    AdTags,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::ad_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdTags.def()
    }
}

impl Related<super::tags::Entity> for Entity {
    fn to() -> RelationDef {
        super::ad_tags::Relation::Tag.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::ad_tags::Relation::Ad.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
