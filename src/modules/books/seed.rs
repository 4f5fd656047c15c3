//! Records every freshly started catalog contains.

use super::models::Book;

const SEED: &[(&str, &str, &str)] = &[
    (
        "Everything You Need to Ace Computer Science and Coding in One Big Fat Notebook: The Complete Middle School Study Guide (Big Fat Notebooks)",
        "Workman Publishing",
        "/images/code1.jpg",
    ),
    (
        "Cracking the Coding Interview: 189 Programming Questions and Solutions (Cracking the Interview & Career)",
        "Gayle Laakmann McDowell",
        "/images/code2.jpg",
    ),
    (
        "Python Crash Course, 3rd Edition: A Hands-On, Project-Based Introduction to Programming",
        "Eric Matthes",
        "/images/code3.jpg",
    ),
    (
        "C# & C++: 5 Books in 1 - The #1 Coding Course from Beginner to Advanced (Computer Programming)",
        "Mark Reed",
        "/images/code4.jpg",
    ),
    (
        "COMPUTER PROGRAMMING FUNDAMENTALS: [4 Books in 1] Coding For Beginners, Coding With Python, SQL Programming For Beginners, Coding HTML. A Complete ... With A Crash Course. (Coding Made Easy)",
        "Ashton Miller",
        "/images/code5.jpg",
    ),
    (
        "The Pragmatic Programmer: Your Journey To Mastery, 20th Anniversary Edition (2nd Edition)",
        "David Thomas",
        "/images/code6.jpg",
    ),
    (
        "ICD-10-CM and ICD-10-PCS Coding Handbook without Answers 2025",
        "Nelly Leon-Chisen",
        "/images/code7.jpg",
    ),
    (
        "Python, Javascript, Java, SQL, Linux: The Complete Coding and Developing Crash Course for Beginners (2024) (Computer Programming)",
        "Mark Reed",
        "/images/code8.jpg",
    ),
    (
        "Computer Networking Bible: [3 in 1] The Complete Crash Course to Effectively Design, Implement and Manage Networks. Including Sections on Security, Performance and Scalability",
        "Rick C. Worley",
        "/images/code9.jpg",
    ),
];

/// The seed catalog, ids 1 through 9, all available.
pub fn seed_books() -> Vec<Book> {
    SEED.iter()
        .zip(1..)
        .map(|(&(title, author, image), id)| Book {
            id,
            title: title.to_string(),
            author: author.to_string(),
            image: image.to_string(),
            available: true,
        })
        .collect()
}
