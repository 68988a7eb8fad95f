// tests/helpers/test_data.rs - Seed data served by the mock API

use serde_json::{json, Map, Value};

pub const CATEGORIES: &[&str] = &[
    "beauty",
    "fragrances",
    "furniture",
    "groceries",
    "laptops",
    "smartphones",
];

/// (title, category, price, discountPercentage)
const PRODUCTS: &[(&str, &str, f64, f64)] = &[
    ("Essence Mascara Lash Princess", "beauty", 9.99, 7.17),
    ("Eyeshadow Palette with Mirror", "beauty", 19.99, 5.5),
    ("Powder Canister", "beauty", 14.99, 18.14),
    ("Red Lipstick", "beauty", 12.99, 19.03),
    ("Red Nail Polish", "beauty", 8.99, 2.46),
    ("Calvin Klein CK One", "fragrances", 49.99, 0.32),
    ("Chanel Coco Noir Eau De", "fragrances", 129.99, 18.64),
    ("Dior J'adore", "fragrances", 89.99, 17.44),
    ("Dolce Shine Eau de", "fragrances", 69.99, 11.02),
    ("Gucci Bloom Eau de", "fragrances", 79.99, 8.9),
    ("Annibale Colombo Bed", "furniture", 1899.99, 8.09),
    ("Annibale Colombo Sofa", "furniture", 2499.99, 14.4),
    ("Bedside Table African Cherry", "furniture", 299.99, 19.09),
    ("Knoll Saarinen Executive Conference Chair", "furniture", 499.99, 2.01),
    ("Wooden Bathroom Sink With Mirror", "furniture", 799.99, 8.8),
    ("Apple", "groceries", 1.99, 12.62),
    ("Beef Steak", "groceries", 12.99, 9.61),
    ("Cat Food", "groceries", 8.99, 9.58),
    ("Chicken Meat", "groceries", 9.99, 13.7),
    ("Cooking Oil", "groceries", 4.99, 9.33),
    ("Cucumber", "groceries", 1.49, 0.16),
    ("Dog Food", "groceries", 10.99, 10.27),
    ("Eggs", "groceries", 2.99, 11.05),
    ("Fish Steak", "groceries", 14.99, 4.23),
    ("Green Bell Pepper", "groceries", 1.29, 0.16),
    ("Apple MacBook Pro 14 Inch Space Grey", "laptops", 1999.99, 9.3),
    ("Asus Zenbook Pro Dual Screen Laptop", "laptops", 1799.99, 11.14),
    ("Huawei Matebook X Pro", "laptops", 1399.99, 9.67),
    ("Lenovo Yoga 920", "laptops", 1099.99, 2.42),
    ("New DELL XPS 13 9300 Laptop", "laptops", 1499.99, 11.7),
    ("iPhone 5s", "smartphones", 199.99, 12.91),
    ("iPhone 6", "smartphones", 299.99, 6.69),
    ("iPhone 13 Pro", "smartphones", 1099.99, 9.37),
    ("iPhone X", "smartphones", 899.99, 19.23),
    ("Oppo A57", "smartphones", 249.99, 6.43),
    ("Samsung Galaxy S10", "smartphones", 699.99, 1.38),
];

/// (firstName, lastName, hair color)
const USERS: &[(&str, &str, &str)] = &[
    ("Emily", "Johnson", "Brown"),
    ("Michael", "Williams", "Green"),
    ("Sophia", "Brown", "White"),
    ("James", "Davis", "Gray"),
    ("Emma", "Miller", "Brown"),
    ("Olivia", "Wilson", "Blonde"),
    ("Alexander", "Jones", "Black"),
    ("Ava", "Taylor", "Brown"),
    ("Ethan", "Martinez", "Red"),
    ("Isabella", "Anderson", "Purple"),
    ("Liam", "Garcia", "Brown"),
    ("Mia", "Rodriguez", "Black"),
    ("Noah", "Hernandez", "Blonde"),
    ("Charlotte", "Lopez", "Brown"),
    ("William", "Gonzalez", "Gray"),
    ("Avery", "Perez", "Black"),
    ("Evelyn", "Sanchez", "Brown"),
    ("Logan", "Torres", "Red"),
    ("Abigail", "Rivera", "Blonde"),
    ("Jackson", "Evans", "Brown"),
    ("Madison", "Collins", "White"),
    ("Elijah", "Stewart", "Black"),
    ("Chloe", "Morales", "Brown"),
    ("Mateo", "Nguyen", "Gray"),
    ("Harper", "Evans", "Blonde"),
    ("Evelyn", "Gonzalez", "Brown"),
    ("Daniel", "Cook", "Black"),
    ("Lily", "Lee", "Brown"),
    ("Henry", "Adams", "Red"),
    ("Addison", "Wright", "Purple"),
    ("Gabriel", "Adams", "Brown"),
    ("Natalie", "Harris", "Black"),
    ("Carter", "Baker", "Blonde"),
    ("Grace", "Perry", "Brown"),
    ("John", "Doe", "Brown"),
];

/// Username is the lowercased first name plus the last name's initial;
/// the password is the username followed by `pass`.
pub fn username_for(first: &str, last: &str) -> String {
    let initial = last.chars().next().unwrap_or('x');
    format!("{}{}", first.to_lowercase(), initial.to_ascii_lowercase())
}

pub fn password_for(username: &str) -> String {
    format!("{}pass", username)
}

pub fn seed_products() -> Vec<Value> {
    PRODUCTS
        .iter()
        .enumerate()
        .map(|(i, (title, category, price, discount))| {
            let thumbnail = format!(
                "https://cdn.dummyjson.com/products/images/{}/thumbnail.png",
                i + 1
            );
            json!({
                "id": i as i64 + 1,
                "title": title,
                "description": format!("{} from the {} range.", title, category),
                "category": category,
                "price": price,
                "discountPercentage": discount,
                "rating": 4.5,
                "stock": 10 + i as i64,
                "thumbnail": thumbnail,
            })
        })
        .collect()
}

pub fn seed_users() -> Vec<Value> {
    USERS
        .iter()
        .enumerate()
        .map(|(i, (first, last, hair))| {
            // the account the suite logs in with
            let username = if i == 0 {
                "emilys".to_string()
            } else {
                username_for(first, last)
            };
            let gender = if i % 2 == 0 { "female" } else { "male" };
            let email = format!("{}.{}@x.dummyjson.com", first.to_lowercase(), last.to_lowercase());
            json!({
                "id": i as i64 + 1,
                "firstName": first,
                "lastName": last,
                "age": 20 + (i as i64 * 7) % 40,
                "gender": gender,
                "email": email,
                "username": username,
                "hair": {"color": hair, "type": "Straight"},
                "address": {"address": format!("{} Main Street", 100 + i), "city": "Phoenix"},
                "company": {"name": format!("{} and Sons", last), "title": "Sales Manager"},
            })
        })
        .collect()
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Cart line built from a catalog product, the way the mock API reports it.
pub fn cart_line(product: &Value, quantity: i64) -> Value {
    let price = product["price"].as_f64().unwrap_or_default();
    let discount = product["discountPercentage"].as_f64().unwrap_or_default();
    let total = price * quantity as f64;
    json!({
        "id": product["id"],
        "title": product["title"],
        "price": price,
        "quantity": quantity,
        "total": round_cents(total),
        "discountPercentage": discount,
        "discountedTotal": round_cents(total * (1.0 - discount / 100.0)),
        "thumbnail": product["thumbnail"],
    })
}

pub fn build_cart(id: i64, user_id: i64, lines: Vec<Value>) -> Value {
    let total: f64 = lines.iter().filter_map(|l| l["total"].as_f64()).sum();
    let discounted: f64 = lines.iter().filter_map(|l| l["discountedTotal"].as_f64()).sum();
    let quantity: i64 = lines.iter().filter_map(|l| l["quantity"].as_i64()).sum();
    let mut cart = Map::new();
    cart.insert("id".into(), json!(id));
    cart.insert("total".into(), json!(round_cents(total)));
    cart.insert("discountedTotal".into(), json!(round_cents(discounted)));
    cart.insert("userId".into(), json!(user_id));
    cart.insert("totalProducts".into(), json!(lines.len()));
    cart.insert("totalQuantity".into(), json!(quantity));
    cart.insert("products".into(), Value::Array(lines));
    Value::Object(cart)
}

pub fn seed_carts(products: &[Value]) -> Vec<Value> {
    (0..20)
        .map(|i: usize| {
            let lines = (0..(2 + i % 3))
                .map(|j| {
                    let product = &products[(i * 3 + j * 5) % products.len()];
                    cart_line(product, 1 + ((i + j) % 4) as i64)
                })
                .collect();
            build_cart(i as i64 + 1, (i % 10) as i64 + 1, lines)
        })
        .collect()
}
