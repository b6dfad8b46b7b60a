//! Post image entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "post_images")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub post_id: Uuid,
    pub image: String,
    pub caption: String,
    pub alt_text: String,
    pub order: i32,
    pub uploaded_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for gazette_core::domain::PostImage {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            post_id: model.post_id,
            image: model.image,
            caption: model.caption,
            alt_text: model.alt_text,
            order: model.order,
            uploaded_at: model.uploaded_at.into(),
        }
    }
}

impl From<gazette_core::domain::PostImage> for ActiveModel {
    fn from(image: gazette_core::domain::PostImage) -> Self {
        Self {
            id: Set(image.id),
            post_id: Set(image.post_id),
            image: Set(image.image),
            caption: Set(image.caption),
            alt_text: Set(image.alt_text),
            order: Set(image.order),
            uploaded_at: Set(image.uploaded_at.into()),
        }
    }
}
