use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ad_tags::Entity")]
    AdTags,
}

impl Related<super::ad_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdTags.def()
    }
}

impl Related<super::ads::Entity> for Entity {
    fn to() -> RelationDef {
        super::ad_tags::Relation::Ad.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::ad_tags::Relation::Tag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
