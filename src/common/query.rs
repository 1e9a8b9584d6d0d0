// src/common/query.rs

//! Motor genérico de busca: filtra, ordena e pagina coleções em memória.
//!
//! Toda listagem (clientes, produtos, fornecedores, pedidos, transações)
//! passa por [`paginate_query`]. O predicado é específico de cada entidade;
//! a ordenação só aceita campos declarados em `sortable_fields`.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Parâmetros de busca vindos da tela de listagem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
    pub search: Option<String>,
    pub filters: HashMap<String, Value>,
    /// Inclui registros desativados (só vale para entidades com soft delete).
    pub include_inactive: bool,
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn sort(mut self, field: &str) -> Self {
        self.sort = Some(field.to_string());
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub fn search(mut self, text: &str) -> Self {
        self.search = Some(text.to_string());
        self
    }

    pub fn filter(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.filters.insert(key.to_string(), value.into());
        self
    }

    pub fn include_inactive(mut self) -> Self {
        self.include_inactive = true;
        self
    }

    /// Texto de busca já em minúsculas; `None` quando vazio.
    pub fn search_text(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// Texto de busca sem normalização (para documentos).
    pub fn raw_search(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.trim().is_empty())
    }

    // --- Leitura tipada dos filtros ---
    // Null e string vazia contam como "filtro ausente".

    pub fn filter_str(&self, key: &str) -> Option<&str> {
        match self.filters.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    // Valor presente que não converte vira `Malformed`: o filtro não casa com nada.
    fn typed_filter<T>(&self, key: &str, parse: impl FnOnce(&Value) -> Option<T>) -> TypedFilter<T> {
        match self.filters.get(key) {
            None | Some(Value::Null) => TypedFilter::Absent,
            Some(Value::String(s)) if s.is_empty() => TypedFilter::Absent,
            Some(value) => parse(value).map_or(TypedFilter::Malformed, TypedFilter::Value),
        }
    }

    /// Filtro de texto convertido por `parse` (ex.: enums).
    pub fn filter_parsed<T>(&self, key: &str, parse: impl FnOnce(&str) -> Option<T>) -> TypedFilter<T> {
        self.typed_filter(key, |value| value.as_str().and_then(parse))
    }

    pub fn filter_uuid(&self, key: &str) -> TypedFilter<Uuid> {
        self.filter_parsed(key, |s| Uuid::parse_str(s).ok())
    }

    pub fn filter_decimal(&self, key: &str) -> TypedFilter<Decimal> {
        self.typed_filter(key, |value| match value {
            Value::Number(n) => n.to_string().parse().ok(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn filter_bool(&self, key: &str) -> bool {
        match self.filters.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    pub fn filter_datetime(&self, key: &str) -> TypedFilter<DateTime<Utc>> {
        self.filter_parsed(key, parse_iso_datetime)
    }
}

/// Filtro de igualdade/faixa já convertido.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypedFilter<T> {
    /// Não informado: não filtra.
    Absent,
    Value(T),
    /// Informado mas inválido (`categoryId = "abc"`): nenhuma linha casa.
    Malformed,
}

impl<T: Copy> TypedFilter<T> {
    pub fn matches(&self, predicate: impl FnOnce(T) -> bool) -> bool {
        match self {
            TypedFilter::Absent => true,
            TypedFilter::Value(value) => predicate(*value),
            TypedFilter::Malformed => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: usize,
    pub page: u32,
    pub limit: u32,
    pub total_pages: usize,
}

/// Valor de um campo ordenável, já tipado.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(Decimal),
    Integer(i64),
    Timestamp(DateTime<Utc>),
    Bool(bool),
    Missing,
}

impl FieldValue {
    pub fn text(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }

    // Strings que são datas ISO comparam como instante; as demais, sem caixa.
    fn normalized(self) -> Self {
        match self {
            FieldValue::Text(s) => match parse_iso_datetime(&s) {
                Some(ts) => FieldValue::Timestamp(ts),
                None => FieldValue::Text(s.to_lowercase()),
            },
            FieldValue::Integer(i) => FieldValue::Number(Decimal::from(i)),
            other => other,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Number(_) | FieldValue::Integer(_) => 0,
            FieldValue::Timestamp(_) => 1,
            FieldValue::Text(_) => 2,
            FieldValue::Bool(_) => 3,
            FieldValue::Missing => 4,
        }
    }

    /// Ordem total: tipos diferentes comparam pelo rank, ausentes por último.
    pub fn compare(self, other: Self) -> Ordering {
        let (a, b) = (self.normalized(), other.normalized());
        match (&a, &b) {
            (FieldValue::Number(x), FieldValue::Number(y)) => x.cmp(y),
            (FieldValue::Timestamp(x), FieldValue::Timestamp(y)) => x.cmp(y),
            (FieldValue::Text(x), FieldValue::Text(y)) => x.cmp(y),
            (FieldValue::Bool(x), FieldValue::Bool(y)) => x.cmp(y),
            _ => a.rank().cmp(&b.rank()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::text(value)
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        FieldValue::Text(value.clone())
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Missing, Into::into)
    }
}

/// Acesso tipado aos campos ordenáveis de uma entidade.
///
/// Caminhos com ponto (`address.city`) descem em objetos de valor
/// embutidos; cada entidade enumera os caminhos que conhece.
pub trait Sortable {
    fn sort_value(&self, path: &str) -> Option<FieldValue>;
}

pub fn parse_iso_datetime(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Filtra -> ordena -> pagina.
///
/// Campo de ordenação desconhecido desliga a ordenação (mantém a ordem de
/// entrada). Página fora do intervalo devolve `data` vazio.
pub fn paginate_query<T, F>(
    items: &[T],
    params: &SearchParams,
    predicate: F,
    sortable_fields: &[&str],
) -> PaginatedResponse<T>
where
    T: Sortable + Clone,
    F: Fn(&T) -> bool,
{
    let page = params.page.unwrap_or(DEFAULT_PAGE).max(1);
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).max(1);
    let order = params.order.unwrap_or_default();

    let mut results: Vec<T> = items.iter().filter(|item| predicate(item)).cloned().collect();

    let sort = params
        .sort
        .as_deref()
        .or_else(|| sortable_fields.first().copied())
        .filter(|field| sortable_fields.contains(field));

    if let Some(field) = sort {
        // sort_by é estável: empates mantêm a ordem de entrada
        results.sort_by(|a, b| {
            let va = a.sort_value(field).unwrap_or(FieldValue::Missing);
            let vb = b.sort_value(field).unwrap_or(FieldValue::Missing);
            match order {
                SortOrder::Asc => va.compare(vb),
                SortOrder::Desc => vb.compare(va),
            }
        });
    }

    let total = results.len();
    let limit_usize = limit as usize;
    let total_pages = total.div_ceil(limit_usize);
    let start = (page as usize - 1).saturating_mul(limit_usize);

    let data = if start >= total {
        Vec::new()
    } else {
        results.into_iter().skip(start).take(limit_usize).collect()
    };

    PaginatedResponse {
        data,
        total,
        page,
        limit,
        total_pages,
    }
}
